mod display;
mod filters;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use leadrank_core::{
    LeadRecord, PAGE_SIZE, enrichment_query, filter, find_by_employer, paginate,
    priority_breakdown, summarize, top_priority,
};
use leadrank_store::{ExportKind, export_csv, load_snapshot};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use filters::FilterArgs;

#[derive(Parser)]
#[command(name = "leadrank", version, about = "Self-insured employer lead prioritization")]
struct Cli {
    /// Lead file (.csv or .parquet).
    #[arg(
        long,
        global = true,
        env = "LEADRANK_DATA",
        default_value = "self_insured_crm_list.csv"
    )]
    data: PathBuf,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dashboard summary of the filtered leads.
    Summary {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Paged table of the filtered leads.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Top 50 priority leads.
    Top {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the enrichment query for one employer in the filtered view.
    Query {
        /// Employer name (exact, falling back to case-insensitive).
        employer: String,
    },
    /// Write an export CSV.
    Export {
        #[arg(long, value_enum, default_value_t = ExportArg::Filtered)]
        kind: ExportArg,
        /// Output path; defaults to a per-kind file name in the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportArg {
    /// Filtered leads.
    Filtered,
    /// Filtered leads with enrichment queries.
    Queries,
    /// Top 50 priority leads with enrichment queries.
    Top,
}

impl From<ExportArg> for ExportKind {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Filtered => ExportKind::Filtered,
            ExportArg::Queries => ExportKind::WithQueries,
            ExportArg::Top => ExportKind::TopPriority,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("leadrank v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let spec = cli.filters.to_spec()?;
    let (snapshot, _report) = load_snapshot(&cli.data)
        .with_context(|| format!("data unavailable: cannot load {}", cli.data.display()))?;
    let view = filter(snapshot.records(), &spec);

    match cli.command {
        Command::Summary { json } => {
            let summary = summarize(view.iter().copied());
            if json {
                let mut out = serde_json::to_value(&summary)?;
                if let Some(obj) = out.as_object_mut() {
                    obj.insert("available_states".into(), json!(snapshot.states()));
                    obj.insert(
                        "participant_range".into(),
                        json!(snapshot.participant_range()),
                    );
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                display::print_dataset(&snapshot);
                display::print_summary(&summary);
            }
        }
        Command::List { page } => {
            let page = paginate(&view, page, PAGE_SIZE);
            println!("Filtered Leads ({} results)", view.len());
            display::print_page(&page)?;
        }
        Command::Top { json } => {
            let ranked = top_priority(view.iter().copied());
            let breakdown = priority_breakdown(ranked.iter().copied());
            if json {
                let leads: Vec<_> = ranked.iter().map(|r| lead_json(r)).collect();
                let out = json!({ "leads": leads, "breakdown": breakdown });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                display::print_top(&ranked, &breakdown)?;
            }
        }
        Command::Query { employer } => {
            let Some(record) = find_by_employer(&view, &employer) else {
                bail!("no lead named {employer:?} matches the current filters");
            };
            display::print_query_card(record, &enrichment_query(record));
        }
        Command::Export { kind, out } => {
            let kind = ExportKind::from(kind);
            let path = out.unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
            let rows = export_csv(&path, &view, kind)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("  Wrote {rows} leads to {}", path.display());
        }
    }

    Ok(())
}

fn lead_json(record: &LeadRecord) -> serde_json::Value {
    json!({
        "employer_name": record.employer_name,
        "ein": record.ein,
        "state": record.state,
        "participant_count": record.participant_count,
        "plan_name": record.plan_name,
        "segment": record.segment(),
        "tier": record.tier(),
        "enrichment_query": enrichment_query(record),
    })
}
