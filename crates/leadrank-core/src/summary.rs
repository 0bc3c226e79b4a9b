//! Dashboard aggregates over a set of leads.
//!
//! Every aggregate is defined for an empty input: counts are zero, the median
//! and mean are `None`, and the size distribution still lists all buckets.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{LeadRecord, Segment, Tier};

/// Lower edges of the participant-size buckets. The last bucket is open-ended.
pub const SIZE_BUCKET_BOUNDS: [u64; 6] = [0, 500, 1_000, 2_500, 5_000, 10_000];

/// How many states the geography view shows.
pub const TOP_STATES: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub median_participants: Option<f64>,
    /// Every tier is present, zero-filled.
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Every segment is present, zero-filled.
    pub segment_counts: BTreeMap<Segment, usize>,
    /// Count per non-blank state, largest first, ties by state code.
    pub states: Vec<StateCount>,
    pub size_buckets: Vec<SizeBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub state: String,
    pub tier: Tier,
    pub count: usize,
}

/// Half-open participant range `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeBucket {
    pub lower: u64,
    pub upper: Option<u64>,
    pub count: usize,
}

impl SizeBucket {
    pub fn label(&self) -> String {
        match self.upper {
            Some(upper) => format!("{}-{}", self.lower, upper - 1),
            None => format!("{}+", self.lower),
        }
    }

    pub fn contains(&self, participants: u64) -> bool {
        participants >= self.lower && self.upper.is_none_or(|u| participants < u)
    }
}

impl DashboardSummary {
    pub fn tier_count(&self, tier: Tier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }

    pub fn segment_count(&self, segment: Segment) -> usize {
        self.segment_counts.get(&segment).copied().unwrap_or(0)
    }

    /// The `n` states with the most leads.
    pub fn top_states(&self, n: usize) -> &[StateCount] {
        &self.states[..self.states.len().min(n)]
    }
}

/// Compute the dashboard summary for a set of leads.
pub fn summarize<'a, I>(records: I) -> DashboardSummary
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let mut tier_counts: BTreeMap<Tier, usize> = Tier::ALL.iter().map(|t| (*t, 0)).collect();
    let mut segment_counts: BTreeMap<Segment, usize> =
        Segment::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_state: HashMap<&str, usize> = HashMap::new();
    let mut size_buckets = empty_buckets();
    let mut participants = Vec::new();

    for record in records {
        *tier_counts.entry(record.tier()).or_default() += 1;
        *segment_counts.entry(record.segment()).or_default() += 1;
        if !record.state.is_empty() {
            *by_state.entry(record.state.as_str()).or_default() += 1;
        }
        if let Some(bucket) = size_buckets
            .iter_mut()
            .find(|b| b.contains(record.participant_count))
        {
            bucket.count += 1;
        }
        participants.push(record.participant_count);
    }

    let mut states: Vec<StateCount> = by_state
        .into_iter()
        .map(|(state, count)| StateCount {
            state: state.to_string(),
            tier: Tier::of_state(state),
            count,
        })
        .collect();
    states.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));

    DashboardSummary {
        total: participants.len(),
        median_participants: median(&mut participants),
        tier_counts,
        segment_counts,
        states,
        size_buckets,
    }
}

fn empty_buckets() -> Vec<SizeBucket> {
    SIZE_BUCKET_BOUNDS
        .iter()
        .enumerate()
        .map(|(i, &lower)| SizeBucket {
            lower,
            upper: SIZE_BUCKET_BOUNDS.get(i + 1).copied(),
            count: 0,
        })
        .collect()
}

/// Median of `values`; the mean of the two middle values for even lengths.
/// Sorts `values` in place. `None` when empty.
pub fn median(values: &mut [u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f64)
    } else {
        Some((values[mid - 1] as f64 + values[mid] as f64) / 2.0)
    }
}

// ── Priority breakdown ──

/// Headline numbers for a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityBreakdown {
    pub tier1: usize,
    pub mean_participants: Option<f64>,
    pub large: usize,
}

pub fn priority_breakdown<'a, I>(records: I) -> PriorityBreakdown
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let mut tier1 = 0;
    let mut large = 0;
    let mut sum = 0u128;
    let mut n = 0usize;
    for record in records {
        if record.tier() == Tier::Tier1 {
            tier1 += 1;
        }
        if record.segment() == Segment::Large {
            large += 1;
        }
        sum += u128::from(record.participant_count);
        n += 1;
    }
    PriorityBreakdown {
        tier1,
        mean_participants: (n > 0).then(|| sum as f64 / n as f64),
        large,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Snapshot;

    fn sample() -> Snapshot {
        Snapshot::new(vec![
            LeadRecord::new("A", "1", "NY", 250),
            LeadRecord::new("B", "2", "NY", 750),
            LeadRecord::new("C", "3", "TX", 2_500),
            LeadRecord::new("D", "4", "CA", 5_000),
            LeadRecord::new("E", "5", "WY", 15_000),
            LeadRecord::new("F", "6", "", 999),
        ])
    }

    #[test]
    fn empty_set_summary() {
        let s = summarize(Snapshot::empty().records());
        assert_eq!(s.total, 0);
        assert_eq!(s.median_participants, None);
        assert!(s.tier_counts.values().all(|&c| c == 0));
        assert_eq!(s.tier_counts.len(), 3);
        assert_eq!(s.segment_counts.len(), 3);
        assert!(s.states.is_empty());
        assert_eq!(s.size_buckets.len(), SIZE_BUCKET_BOUNDS.len());
        assert!(s.size_buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn counts_and_median() {
        let s = summarize(sample().records());
        assert_eq!(s.total, 6);
        // 250 750 999 2500 5000 15000
        assert_eq!(s.median_participants, Some(1_749.5));
        assert_eq!(s.tier_count(Tier::Tier1), 3);
        assert_eq!(s.tier_count(Tier::Tier2), 1);
        assert_eq!(s.tier_count(Tier::Other), 2);
        assert_eq!(s.segment_count(Segment::Small), 1);
        assert_eq!(s.segment_count(Segment::MidMarket), 3);
        assert_eq!(s.segment_count(Segment::Large), 2);
    }

    #[test]
    fn odd_median() {
        let mut v = vec![9, 1, 5];
        assert_eq!(median(&mut v), Some(5.0));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn state_distribution_ordering() {
        let s = summarize(sample().records());
        let got: Vec<(&str, Tier, usize)> = s
            .states
            .iter()
            .map(|c| (c.state.as_str(), c.tier, c.count))
            .collect();
        assert_eq!(
            got,
            vec![
                ("NY", Tier::Tier1, 2),
                ("CA", Tier::Tier1, 1),
                ("TX", Tier::Tier2, 1),
                ("WY", Tier::Other, 1),
            ]
        );
        assert_eq!(s.top_states(2).len(), 2);
        assert_eq!(s.top_states(TOP_STATES).len(), 4);
    }

    #[test]
    fn size_buckets_are_fixed_half_open() {
        let s = summarize(sample().records());
        let got: Vec<(String, usize)> = s
            .size_buckets
            .iter()
            .map(|b| (b.label(), b.count))
            .collect();
        assert_eq!(
            got,
            vec![
                ("0-499".to_string(), 1),
                ("500-999".to_string(), 2),
                ("1000-2499".to_string(), 0),
                ("2500-4999".to_string(), 1),
                ("5000-9999".to_string(), 1),
                ("10000+".to_string(), 1),
            ]
        );
        let total: usize = s.size_buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, s.total);
    }

    #[test]
    fn breakdown() {
        let b = priority_breakdown(sample().records());
        assert_eq!(b.tier1, 3);
        assert_eq!(b.large, 2);
        let mean = b.mean_participants.unwrap();
        assert!((mean - 24_499.0 / 6.0).abs() < 1e-9);

        let empty = priority_breakdown(Snapshot::empty().records());
        assert_eq!(empty.mean_participants, None);
        assert_eq!(empty.tier1, 0);
    }

    #[test]
    fn summary_serializes_to_json() {
        let s = summarize(sample().records());
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["total"], 6);
        assert_eq!(v["tier_counts"]["tier1"], 3);
        assert_eq!(v["segment_counts"]["mid_market"], 3);
        assert_eq!(v["size_buckets"][5]["upper"], serde_json::Value::Null);

        let empty = serde_json::to_value(summarize(Snapshot::empty().records())).unwrap();
        assert!(empty["median_participants"].is_null());
    }
}
