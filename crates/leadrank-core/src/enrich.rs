//! Enrichment query text for the external research tool.
//!
//! The query is only ever formatted here; nothing in this crate sends it
//! anywhere.

use crate::LeadRecord;

/// Research prompt for finding the benefits decision-maker at an employer.
pub fn enrichment_query(record: &LeadRecord) -> String {
    format!(
        "Find the employee benefits decision-maker (HR Director, Benefits Manager, or CFO) \
         for {} (EIN: {}) in {}. Include their name, title, email, and phone if available.",
        record.employer_name, record.ein, record.state
    )
}

/// First record whose employer name equals `name`, falling back to a
/// case-insensitive match when there is no exact one.
pub fn find_by_employer<'a>(records: &[&'a LeadRecord], name: &str) -> Option<&'a LeadRecord> {
    let name = name.trim();
    records
        .iter()
        .find(|r| r.employer_name == name)
        .or_else(|| {
            let lower = name.to_lowercase();
            records
                .iter()
                .find(|r| r.employer_name.to_lowercase() == lower)
        })
        .copied()
}
