//! Terminal rendering for summaries, lead tables, and query cards.

use arrow::util::pretty::pretty_format_batches;
use leadrank_core::page::thousands;
use leadrank_core::schema::to_record_batch;
use leadrank_core::{
    DashboardSummary, LeadRecord, Page, PriorityBreakdown, Segment, Snapshot, TOP_STATES, Tier,
};

/// Lead table columns, by index into `lead_schema`: name, EIN, state,
/// participants, segment, tier, plan name.
const TABLE_COLUMNS: &[usize] = &[0, 1, 2, 3, 5, 6, 4];

/// Same as [`TABLE_COLUMNS`] without the plan name.
const TOP_COLUMNS: &[usize] = &[0, 1, 2, 3, 5, 6];

// ── Summary ──

pub fn print_summary(summary: &DashboardSummary) {
    println!("=== Summary Statistics ===");
    println!("  {:<26} {}", "Total leads", thousands(summary.total as u64));
    println!(
        "  {:<26} {}",
        "Median participants",
        summary
            .median_participants
            .map(|m| thousands(m as u64))
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  {:<26} {}",
        "Tier 1 states",
        thousands(summary.tier_count(Tier::Tier1) as u64)
    );
    println!(
        "  {:<26} {}",
        "Large market (5K+)",
        thousands(summary.segment_count(Segment::Large) as u64)
    );
    println!();

    if summary.total == 0 {
        println!("No data to display with current filters");
        return;
    }

    println!("Tiers");
    for tier in Tier::ALL {
        println!("  {:<26} {}", tier.label(), summary.tier_count(tier));
    }
    println!();

    println!("Segments");
    for segment in Segment::ALL {
        println!("  {:<26} {}", segment.label(), summary.segment_count(segment));
    }
    println!();

    println!("Top {} states by lead count", TOP_STATES);
    for s in summary.top_states(TOP_STATES) {
        println!("  {:<4} {:<8} {}", s.state, s.tier.label(), s.count);
    }
    println!();

    println!("Participants per lead");
    for b in &summary.size_buckets {
        println!("  {:<26} {}", b.label(), b.count);
    }
}

/// Filter choices offered by the full dataset, independent of the active filters.
pub fn print_dataset(snapshot: &Snapshot) {
    println!("=== Dataset ===");
    println!("  {:<26} {}", "Leads loaded", thousands(snapshot.len() as u64));
    println!(
        "  {:<26} {}",
        "Participant range",
        snapshot
            .participant_range()
            .map(|(lo, hi)| format!("{} - {}", thousands(lo), thousands(hi)))
            .unwrap_or_else(|| "-".to_string())
    );
    let states = snapshot.states();
    println!("  {:<26} {}", format!("States ({})", states.len()), states.join(", "));
    println!();
}

// ── Tables ──

/// Print one page of the lead table with its caption.
pub fn print_page(page: &Page<'_, &LeadRecord>) -> anyhow::Result<()> {
    if page.items.is_empty() {
        println!("No leads match your current filters");
        return Ok(());
    }
    print_table(page.items, TABLE_COLUMNS)?;
    println!("{}  (page {} of {})", page.caption(), page.number, page.total_pages);
    Ok(())
}

pub fn print_top(records: &[&LeadRecord], breakdown: &PriorityBreakdown) -> anyhow::Result<()> {
    println!("=== Top {} Priority Leads ===", records.len());
    println!("Sorted by: Tier 1 states first, then by participant count (descending)");
    if records.is_empty() {
        println!("No leads match your current filters");
        return Ok(());
    }
    print_table(records, TOP_COLUMNS)?;
    println!();
    println!("Priority Breakdown");
    println!("  {:<26} {}", "Tier 1 leads", breakdown.tier1);
    println!(
        "  {:<26} {}",
        "Avg participants",
        breakdown
            .mean_participants
            .map(|m| thousands(m as u64))
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  {:<26} {}", "Large market", breakdown.large);
    Ok(())
}

fn print_table(records: &[&LeadRecord], columns: &[usize]) -> anyhow::Result<()> {
    let batch = to_record_batch(records, false)?.project(columns)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

// ── Query card ──

/// Print a single lead as a vertical card followed by its enrichment query.
pub fn print_query_card(record: &LeadRecord, query: &str) {
    println!("=== {} ===", record.employer_name);
    println!("  {:<26} {}", "EIN", record.ein);
    println!("  {:<26} {}", "State", record.state);
    println!(
        "  {:<26} {}",
        "Participants",
        thousands(record.participant_count)
    );
    if let Some(plan) = &record.plan_name {
        println!("  {:<26} {}", "Plan", plan);
    }
    println!("  {:<26} {}", "Segment", record.segment().label());
    println!("  {:<26} {}", "Tier", record.tier().label());
    println!();
    println!("Copy this query to the research tool:");
    println!("{query}");
}
