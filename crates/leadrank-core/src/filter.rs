//! Composable lead filters.
//!
//! A [`FilterConfig`] is the raw, loosely-typed form that arrives from a JSON
//! file or command-line flags. [`FilterConfig::validate`] turns it into a
//! [`FilterSpec`], rejecting malformed input instead of guessing. Only a
//! validated spec can be applied with [`filter`].
//!
//! All active constraints are combined with AND. The free-text search is an
//! OR over employer name and EIN.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{LeadRecord, Segment, SpecError, TIER1_STATES, Tier, normalize_state};

// ── Raw configuration ──

/// A participant bound as written by the user: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(serde_json::Number),
    Text(String),
}

impl Bound {
    fn parse(&self, field: &'static str) -> Result<u64, SpecError> {
        let invalid = || SpecError::InvalidBound {
            field,
            value: match self {
                Bound::Number(n) => n.to_string(),
                Bound::Text(s) => s.clone(),
            },
        };
        match self {
            Bound::Number(n) => n.as_u64().ok_or_else(invalid),
            Bound::Text(s) => s.trim().parse::<u64>().map_err(|_| invalid()),
        }
    }
}

impl From<u64> for Bound {
    fn from(n: u64) -> Self {
        Bound::Number(n.into())
    }
}

/// Unvalidated filter options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub states: Vec<String>,
    pub tiers: Vec<String>,
    pub participant_min: Option<Bound>,
    pub participant_max: Option<Bound>,
    pub segments: Vec<String>,
    pub search_text: Option<String>,
}

impl FilterConfig {
    /// Parse a JSON filter file.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Layer `overrides` on top of `self`. Non-empty lists and present values
    /// in `overrides` win.
    pub fn merge(mut self, overrides: FilterConfig) -> FilterConfig {
        if !overrides.states.is_empty() {
            self.states = overrides.states;
        }
        if !overrides.tiers.is_empty() {
            self.tiers = overrides.tiers;
        }
        if overrides.participant_min.is_some() {
            self.participant_min = overrides.participant_min;
        }
        if overrides.participant_max.is_some() {
            self.participant_max = overrides.participant_max;
        }
        if !overrides.segments.is_empty() {
            self.segments = overrides.segments;
        }
        if overrides.search_text.is_some() {
            self.search_text = overrides.search_text;
        }
        self
    }

    /// Check every option and build a [`FilterSpec`].
    ///
    /// `participant_min > participant_max` is accepted; it simply matches
    /// nothing.
    pub fn validate(&self) -> Result<FilterSpec, SpecError> {
        let states = self
            .states
            .iter()
            .map(|s| {
                let code = normalize_state(s);
                if code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()) {
                    Ok(code)
                } else {
                    Err(SpecError::InvalidState(s.clone()))
                }
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        let tiers = self
            .tiers
            .iter()
            .map(|t| t.parse::<Tier>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let segments = self
            .segments
            .iter()
            .map(|s| s.parse::<Segment>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let participant_min = self
            .participant_min
            .as_ref()
            .map(|b| b.parse("participant_min"))
            .transpose()?
            .unwrap_or(0);

        let participant_max = self
            .participant_max
            .as_ref()
            .map(|b| b.parse("participant_max"))
            .transpose()?;

        let search_text = self
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(FilterSpec {
            states,
            tiers,
            participant_min,
            participant_max,
            segments,
            search_text,
        })
    }
}

// ── Validated spec ──

/// Minimum-size shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePreset {
    OneK,
    TwoAndHalfK,
    FiveK,
}

impl SizePreset {
    pub fn min_participants(&self) -> u64 {
        match self {
            Self::OneK => 1_000,
            Self::TwoAndHalfK => 2_500,
            Self::FiveK => 5_000,
        }
    }
}

/// A validated filter. The default spec matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Empty means all states.
    pub states: BTreeSet<String>,
    /// Empty means all tiers.
    pub tiers: BTreeSet<Tier>,
    /// Inclusive.
    pub participant_min: u64,
    /// Inclusive; `None` is unbounded.
    pub participant_max: Option<u64>,
    /// Empty means all segments.
    pub segments: BTreeSet<Segment>,
    pub search_text: Option<String>,
}

impl FilterSpec {
    /// Restrict to the Tier 1 states.
    pub fn tier1_states() -> Self {
        Self::default().with_states(TIER1_STATES.iter().copied())
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.states = states
            .into_iter()
            .map(|s| normalize_state(s.as_ref()))
            .collect();
        self
    }

    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = Tier>) -> Self {
        self.tiers = tiers.into_iter().collect();
        self
    }

    pub fn with_min(mut self, min: u64) -> Self {
        self.participant_min = min;
        self
    }

    pub fn with_max(mut self, max: u64) -> Self {
        self.participant_max = Some(max);
        self
    }

    pub fn with_size_preset(self, preset: SizePreset) -> Self {
        self.with_min(preset.min_participants())
    }

    pub fn with_segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments = segments.into_iter().collect();
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.trim();
        self.search_text = (!text.is_empty()).then(|| text.to_string());
        self
    }

    /// True when no constraint is active.
    pub fn is_unrestricted(&self) -> bool {
        *self == FilterSpec::default()
    }

    /// Whether a single record passes every active constraint.
    pub fn matches(&self, record: &LeadRecord) -> bool {
        let needle = self.search_text.as_deref().map(str::to_lowercase);
        self.matches_with(record, needle.as_deref())
    }

    fn matches_with(&self, record: &LeadRecord, needle: Option<&str>) -> bool {
        if !self.states.is_empty() && !self.states.contains(&record.state) {
            return false;
        }
        if !self.tiers.is_empty() && !self.tiers.contains(&record.tier()) {
            return false;
        }
        if record.participant_count < self.participant_min {
            return false;
        }
        if let Some(max) = self.participant_max
            && record.participant_count > max
        {
            return false;
        }
        if !self.segments.is_empty() && !self.segments.contains(&record.segment()) {
            return false;
        }
        match needle {
            Some(needle) => {
                record.employer_name.to_lowercase().contains(needle)
                    || record.ein.to_lowercase().contains(needle)
                    || ein_contains(&record.ein, needle)
            }
            None => true,
        }
    }
}

/// EIN match with `-` and spaces ignored on both sides.
fn ein_contains(ein: &str, needle: &str) -> bool {
    let needle = strip_ein_separators(needle);
    !needle.is_empty() && strip_ein_separators(&ein.to_lowercase()).contains(&needle)
}

fn strip_ein_separators(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '-' | ' ')).collect()
}

/// Keep the records that satisfy `spec`, in their original order.
///
/// Takes any sequence of borrowed records, so a filtered view can be filtered
/// again without copying.
pub fn filter<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a LeadRecord>
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let needle = spec.search_text.as_deref().map(str::to_lowercase);
    let out: Vec<&LeadRecord> = records
        .into_iter()
        .filter(|r| spec.matches_with(r, needle.as_deref()))
        .collect();
    debug!(matched = out.len(), "applied lead filter");
    out
}
