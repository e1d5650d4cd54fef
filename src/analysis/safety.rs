//! Adaptive safety scoring.
//!
//! Each dimension is a pure function of a narrow input slice with its own
//! cap, so no single signal can dominate the total. The ordered dimension
//! table doubles as the audit trail: one breakdown line per dimension,
//! and the earned points always sum to the reported score.
//!
//! Missing inputs score zero for their dimension. A degraded sub-fetch
//! therefore lowers the total instead of being averaged away, and the
//! reader can line the breakdown up against the report's error list.

use crate::models::report::{HolderSummary, MarketData, SafetyScore, SocialPresence};
use crate::models::token::SecurityInfo;

pub const LIQUIDITY_MAX: u32 = 30;
pub const HOLDER_MAX: u32 = 15;
pub const AGE_MAX: u32 = 15;
pub const SECURITY_MAX: u32 = 30;
pub const SOCIAL_MAX: u32 = 10;

/// Whale-concentration level above which the holder dimension is docked.
const CONCENTRATION_PENALTY_THRESHOLD: f64 = 60.0;
const CONCENTRATION_PENALTY: u32 = 5;

/// Liquidity depth, diminishing returns past $100k.
pub fn liquidity_points(liquidity: Option<f64>) -> u32 {
    match liquidity {
        Some(l) if l >= 100_000.0 => LIQUIDITY_MAX,
        Some(l) if l >= 50_000.0 => 25,
        Some(l) if l >= 20_000.0 => 19,
        Some(l) if l >= 10_000.0 => 14,
        Some(l) if l >= 5_000.0 => 9,
        Some(l) if l > 0.0 => 4,
        _ => 0,
    }
}

/// Holder base size, adjusted by what is known about distribution.
///
/// When the distribution fetch degraded the dimension is halved: a wide
/// holder base means little if it cannot be checked for whale stacking.
pub fn holder_points(
    holder_count: Option<u64>,
    whale_concentration_top10: Option<f64>,
    distribution_known: bool,
) -> u32 {
    let base = match holder_count {
        Some(h) if h >= 5_000 => HOLDER_MAX,
        Some(h) if h >= 1_000 => 12,
        Some(h) if h >= 500 => 9,
        Some(h) if h >= 100 => 6,
        Some(h) if h >= 25 => 3,
        _ => 0,
    };
    if !distribution_known {
        return base / 2;
    }
    match whale_concentration_top10 {
        Some(c) if c > CONCENTRATION_PENALTY_THRESHOLD => {
            base.saturating_sub(CONCENTRATION_PENALTY)
        }
        _ => base,
    }
}

/// Token age: newer means higher rug risk, plateau past 30 days.
pub fn age_points(created_timestamp: Option<i64>, now: i64) -> u32 {
    let age_days = match created_timestamp {
        Some(ts) if ts > 0 && ts < now => (now - ts) as f64 / 86_400.0,
        _ => return 0,
    };
    if age_days >= 30.0 {
        AGE_MAX
    } else if age_days >= 7.0 {
        12
    } else if age_days >= 3.0 {
        8
    } else if age_days >= 1.0 {
        5
    } else {
        2
    }
}

/// Contract security flags. Honeypot, mintable, or closed-source zero the
/// dimension outright; lesser flags deduct within the cap. A missing
/// security section (degraded fetch) scores zero.
pub fn security_points(security: Option<&SecurityInfo>) -> u32 {
    let sec = match security {
        Some(s) => s,
        None => return 0,
    };

    if sec.is_honeypot == Some(true)
        || sec.is_mintable == Some(true)
        || sec.is_open_source == Some(false)
    {
        return 0;
    }

    let minor_flags = [
        sec.is_proxy,
        sec.can_take_back_ownership,
        sec.owner_change_balance,
        sec.hidden_owner,
        sec.selfdestruct,
        sec.external_call,
    ];
    let deduction = 5 * minor_flags.iter().filter(|f| **f == Some(true)).count() as u32;
    SECURITY_MAX.saturating_sub(deduction)
}

/// Verified social presence: a small bonus, never decisive.
pub fn social_points(socials: &SocialPresence) -> u32 {
    let has = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
    let mut points = 0;
    if has(&socials.website) {
        points += 4;
    }
    if has(&socials.twitter_username) {
        points += 3;
    }
    if has(&socials.telegram) {
        points += 3;
    }
    points
}

/// Fold all dimensions into the final score and its breakdown.
pub fn compute(
    market: &MarketData,
    security: Option<&SecurityInfo>,
    holders: &HolderSummary,
    distribution_known: bool,
    socials: &SocialPresence,
    now: i64,
) -> SafetyScore {
    let dimensions: [(&str, u32, u32); 5] = [
        ("Liquidity", liquidity_points(market.liquidity), LIQUIDITY_MAX),
        (
            "Holders",
            holder_points(
                market.holder_count,
                holders.whale_concentration_top10,
                distribution_known,
            ),
            HOLDER_MAX,
        ),
        ("Age", age_points(market.created_timestamp, now), AGE_MAX),
        ("Security", security_points(security), SECURITY_MAX),
        ("Social", social_points(socials), SOCIAL_MAX),
    ];

    let mut breakdown = Vec::with_capacity(dimensions.len());
    let mut total = 0u32;
    for (name, earned, max) in dimensions {
        breakdown.push(format!("{}: {}/{}", name, earned, max));
        total += earned;
    }

    SafetyScore {
        score: total.min(100),
        breakdown,
    }
}
