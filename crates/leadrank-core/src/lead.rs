//! Employer lead records and their derived tier/segment classification.
//!
//! Tier and segment are never stored on a record. They are recomputed from
//! `state` and `participant_count` every time they are asked for, so the raw
//! and derived views of a lead cannot drift apart.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::SpecError;

/// States whose employers are contacted first.
pub const TIER1_STATES: &[&str] = &["MA", "NY", "CA"];

/// Second-wave states.
pub const TIER2_STATES: &[&str] = &["IL", "TX", "PA", "FL", "NJ", "OH"];

/// Smallest participant count classified as [`Segment::MidMarket`].
pub const MID_MARKET_MIN: u64 = 500;

/// Smallest participant count classified as [`Segment::Large`].
pub const LARGE_MIN: u64 = 5_000;

/// Value used when a participant count is missing or unparseable.
pub const DEFAULT_PARTICIPANT_COUNT: u64 = 0;

// ── Tier ──

/// Geographic priority of an employer's state. Variant order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Tier1,
    Tier2,
    Other,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Tier1, Tier::Tier2, Tier::Other];

    /// Classify a state code. Blank and unknown codes are [`Tier::Other`].
    pub fn of_state(state: &str) -> Self {
        let state = state.trim();
        if TIER1_STATES.iter().any(|s| s.eq_ignore_ascii_case(state)) {
            Tier::Tier1
        } else if TIER2_STATES.iter().any(|s| s.eq_ignore_ascii_case(state)) {
            Tier::Tier2
        } else {
            Tier::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "tier1",
            Self::Tier2 => "tier2",
            Self::Other => "other",
        }
    }

    /// Human-readable label used in tables and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1",
            Self::Tier2 => "Tier 2",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = SpecError;

    /// Accepts `tier1`, `Tier 1`, `tier_1`, `1` and the same for tier 2.
    /// `other`, `tier3` and `3` all mean [`Tier::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "tier1" | "1" => Ok(Tier::Tier1),
            "tier2" | "2" => Ok(Tier::Tier2),
            "other" | "tier3" | "3" => Ok(Tier::Other),
            _ => Err(SpecError::UnknownTier(s.to_string())),
        }
    }
}

// ── Segment ──

/// Market-size bucket derived from participant count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Fewer than 500 participants.
    Small,
    /// 500 up to, but excluding, 5000 participants.
    MidMarket,
    /// 5000 participants or more.
    Large,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Small, Segment::MidMarket, Segment::Large];

    pub fn of_participants(count: u64) -> Self {
        if count >= LARGE_MIN {
            Segment::Large
        } else if count >= MID_MARKET_MIN {
            Segment::MidMarket
        } else {
            Segment::Small
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MidMarket => "mid_market",
            Self::Large => "large",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small (<500)",
            Self::MidMarket => "Mid-Market (500-5K)",
            Self::Large => "Large (5K+)",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Segment {
    type Err = SpecError;

    /// Accepts the snake-case names, the display labels, and `midmarket` /
    /// `mid-market` spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "small" | "small<500" => Ok(Segment::Small),
            "midmarket" | "midmarket5005k" => Ok(Segment::MidMarket),
            "large" | "large5k" => Ok(Segment::Large),
            _ => Err(SpecError::UnknownSegment(s.to_string())),
        }
    }
}

/// Lowercase and drop spaces, underscores, hyphens, and parentheses/plus signs
/// so that `Mid-Market (500-5K)` and `mid_market` compare equal-ish.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '(' | ')' | '+'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ── LeadRecord ──

/// One self-insured employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    pub employer_name: String,
    /// Employer Identification Number. Best-effort key, not guaranteed unique.
    pub ein: String,
    /// Two-letter state code, upper-cased and trimmed.
    pub state: String,
    pub participant_count: u64,
    pub plan_name: Option<String>,
}

impl LeadRecord {
    /// Build a record, normalizing the state code.
    pub fn new(
        employer_name: impl Into<String>,
        ein: impl Into<String>,
        state: &str,
        participant_count: u64,
    ) -> Self {
        Self {
            employer_name: employer_name.into(),
            ein: ein.into(),
            state: normalize_state(state),
            participant_count,
            plan_name: None,
        }
    }

    pub fn with_plan_name(mut self, plan_name: impl Into<String>) -> Self {
        self.plan_name = Some(plan_name.into());
        self
    }

    pub fn tier(&self) -> Tier {
        Tier::of_state(&self.state)
    }

    pub fn segment(&self) -> Segment {
        Segment::of_participants(self.participant_count)
    }
}

/// Derive `(tier, segment)` for a record. Total and side-effect free.
pub fn classify(record: &LeadRecord) -> (Tier, Segment) {
    (record.tier(), record.segment())
}

/// Trim and upper-case a state code.
pub fn normalize_state(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Parse a raw participant count.
///
/// Thousands separators are ignored and finite non-negative decimals are
/// truncated (`"1,200"` and `"1200.0"` both give 1200). Returns `None` for
/// blank, negative, or non-numeric input; callers substitute
/// [`DEFAULT_PARTICIPANT_COUNT`].
pub fn parse_participant_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(n) = cleaned.parse::<u64>() {
        return Some(n);
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f <= u64::MAX as f64 => Some(f.trunc() as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_membership() {
        for s in TIER1_STATES {
            assert_eq!(Tier::of_state(s), Tier::Tier1);
        }
        for s in TIER2_STATES {
            assert_eq!(Tier::of_state(s), Tier::Tier2);
        }
        assert_eq!(Tier::of_state("WY"), Tier::Other);
    }

    #[test]
    fn blank_and_unknown_states_are_other() {
        assert_eq!(Tier::of_state(""), Tier::Other);
        assert_eq!(Tier::of_state("   "), Tier::Other);
        assert_eq!(Tier::of_state("ZZ"), Tier::Other);
        assert_eq!(Tier::of_state("Massachusetts"), Tier::Other);
    }

    #[test]
    fn tier_lookup_ignores_case_and_whitespace() {
        assert_eq!(Tier::of_state(" ma "), Tier::Tier1);
        assert_eq!(Tier::of_state("tx"), Tier::Tier2);
    }

    #[test]
    fn segment_boundaries() {
        assert_eq!(Segment::of_participants(0), Segment::Small);
        assert_eq!(Segment::of_participants(499), Segment::Small);
        assert_eq!(Segment::of_participants(500), Segment::MidMarket);
        assert_eq!(Segment::of_participants(4_999), Segment::MidMarket);
        assert_eq!(Segment::of_participants(5_000), Segment::Large);
        assert_eq!(Segment::of_participants(u64::MAX), Segment::Large);
    }

    #[test]
    fn classify_is_total_and_deterministic() {
        let states = ["MA", "NY", "CA", "IL", "OH", "WY", "", "??"];
        let counts = [0, 1, 499, 500, 4_999, 5_000, 250_000];
        for state in states {
            for count in counts {
                let rec = LeadRecord::new("Acme", "1", state, count);
                let first = classify(&rec);
                assert_eq!(first, classify(&rec));
                assert_eq!(first, (Tier::of_state(state), Segment::of_participants(count)));
            }
        }
    }

    #[test]
    fn derived_fields_follow_raw_fields() {
        let mut rec = LeadRecord::new("Acme", "1", "ny", 600);
        assert_eq!(rec.state, "NY");
        assert_eq!(classify(&rec), (Tier::Tier1, Segment::MidMarket));

        rec.participant_count = 6_000;
        rec.state = "OH".into();
        assert_eq!(classify(&rec), (Tier::Tier2, Segment::Large));
    }

    #[test]
    fn tier_ordering_is_priority_order() {
        assert!(Tier::Tier1 < Tier::Tier2);
        assert!(Tier::Tier2 < Tier::Other);
    }

    #[test]
    fn parse_tier_names() {
        assert_eq!("tier1".parse::<Tier>().unwrap(), Tier::Tier1);
        assert_eq!("Tier 2".parse::<Tier>().unwrap(), Tier::Tier2);
        assert_eq!("TIER_3".parse::<Tier>().unwrap(), Tier::Other);
        assert_eq!("other".parse::<Tier>().unwrap(), Tier::Other);
        assert!(matches!("gold".parse::<Tier>(), Err(SpecError::UnknownTier(_))));
    }

    #[test]
    fn parse_segment_names() {
        assert_eq!("small".parse::<Segment>().unwrap(), Segment::Small);
        assert_eq!("mid_market".parse::<Segment>().unwrap(), Segment::MidMarket);
        assert_eq!("Mid-Market".parse::<Segment>().unwrap(), Segment::MidMarket);
        assert_eq!(
            "Mid-Market (500-5K)".parse::<Segment>().unwrap(),
            Segment::MidMarket
        );
        assert_eq!("Large (5K+)".parse::<Segment>().unwrap(), Segment::Large);
        assert!(matches!(
            "huge".parse::<Segment>(),
            Err(SpecError::UnknownSegment(_))
        ));
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for tier in Tier::ALL {
            assert_eq!(tier.label().parse::<Tier>().unwrap(), tier);
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        for seg in Segment::ALL {
            assert_eq!(seg.label().parse::<Segment>().unwrap(), seg);
            assert_eq!(seg.as_str().parse::<Segment>().unwrap(), seg);
        }
    }

    #[test]
    fn participant_count_parsing() {
        assert_eq!(parse_participant_count("1200"), Some(1200));
        assert_eq!(parse_participant_count(" 1,200 "), Some(1200));
        assert_eq!(parse_participant_count("1200.0"), Some(1200));
        assert_eq!(parse_participant_count("1200.9"), Some(1200));
        assert_eq!(parse_participant_count("0"), Some(0));
    }

    #[test]
    fn malformed_participant_counts_are_rejected() {
        assert_eq!(parse_participant_count(""), None);
        assert_eq!(parse_participant_count("   "), None);
        assert_eq!(parse_participant_count("n/a"), None);
        assert_eq!(parse_participant_count("-5"), None);
        assert_eq!(parse_participant_count("NaN"), None);
        assert_eq!(parse_participant_count("inf"), None);
    }
}
