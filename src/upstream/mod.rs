//! Dual-strategy upstream access.
//!
//! Every logical operation is answered first by the hosted wrapper API
//! (primary) and, where one exists, by a direct scrape of the upstream
//! site with browser-like transport (fallback). Outcomes are tagged
//! (`Fetched::Full` / `Fetched::Partial`) so callers branch on the tag
//! instead of catching errors across strategy boundaries.

pub mod client;
pub mod direct;
pub mod wrapper;

pub use client::{Fetched, UpstreamClient};
