//! Priority ranking of leads.

use std::cmp::Ordering;

use tracing::debug;

use crate::LeadRecord;

/// Number of leads in the priority list.
pub const TOP_N: usize = 50;

/// Priority order: tier ascending, participant count descending, then
/// employer name and EIN ascending (byte order).
pub fn priority_cmp(a: &LeadRecord, b: &LeadRecord) -> Ordering {
    a.tier()
        .cmp(&b.tier())
        .then_with(|| b.participant_count.cmp(&a.participant_count))
        .then_with(|| a.employer_name.cmp(&b.employer_name))
        .then_with(|| a.ein.cmp(&b.ein))
}

/// The first `n` records in priority order.
///
/// The sort is stable, so records that compare equal on every key keep their
/// input order. Returns fewer than `n` records when the input is shorter.
pub fn rank<'a, I>(records: I, n: usize) -> Vec<&'a LeadRecord>
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let mut ranked: Vec<&LeadRecord> = records.into_iter().collect();
    ranked.sort_by(|a, b| priority_cmp(a, b));
    ranked.truncate(n);
    debug!(ranked = ranked.len(), limit = n, "ranked leads");
    ranked
}

/// The Top-50 priority leads.
pub fn top_priority<'a, I>(records: I) -> Vec<&'a LeadRecord>
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    rank(records, TOP_N)
}
