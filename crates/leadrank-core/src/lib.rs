//! Lead prioritization engine: classification, filtering, ranking, and
//! dashboard aggregates over an immutable snapshot of employer leads.

pub mod enrich;
mod error;
pub mod filter;
pub mod lead;
pub mod page;
pub mod rank;
pub mod schema;
pub mod snapshot;
pub mod summary;

pub use enrich::{enrichment_query, find_by_employer};
pub use error::SpecError;
pub use filter::{Bound, FilterConfig, FilterSpec, SizePreset, filter};
pub use lead::{
    DEFAULT_PARTICIPANT_COUNT, LARGE_MIN, LeadRecord, MID_MARKET_MIN, Segment, TIER1_STATES,
    TIER2_STATES, Tier, classify, normalize_state, parse_participant_count,
};
pub use page::{PAGE_SIZE, Page, paginate};
pub use rank::{TOP_N, priority_cmp, rank, top_priority};
pub use snapshot::Snapshot;
pub use summary::{
    DashboardSummary, PriorityBreakdown, SizeBucket, StateCount, TOP_STATES, priority_breakdown,
    summarize,
};
