pub mod deep;
pub mod safety;
pub mod signals;
pub mod trending;
