//! Filter flags shared by every subcommand.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use leadrank_core::{Bound, FilterConfig, FilterSpec, SizePreset, TIER1_STATES};

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// JSON filter file; flags override its values.
    #[arg(long, global = true, env = "LEADRANK_FILTER")]
    pub filter_file: Option<PathBuf>,

    /// State codes to include (repeatable or comma-separated).
    #[arg(long = "state", global = true, value_delimiter = ',')]
    pub states: Vec<String>,

    /// Priority tiers to include: tier1, tier2, other.
    #[arg(long = "tier", global = true, value_delimiter = ',')]
    pub tiers: Vec<String>,

    /// Minimum participants (inclusive).
    #[arg(long = "min", global = true)]
    pub participant_min: Option<String>,

    /// Maximum participants (inclusive).
    #[arg(long = "max", global = true)]
    pub participant_max: Option<String>,

    /// Market segments to include: small, mid-market, large.
    #[arg(long = "segment", global = true, value_delimiter = ',')]
    pub segments: Vec<String>,

    /// Case-insensitive match on employer name or EIN.
    #[arg(long, global = true)]
    pub search: Option<String>,

    /// Only the Tier 1 states (MA, NY, CA).
    #[arg(long, global = true, conflicts_with = "states")]
    pub tier1_states: bool,

    /// Minimum-size shortcut.
    #[arg(long, global = true, value_enum, conflicts_with = "participant_min")]
    pub size: Option<SizeArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SizeArg {
    #[value(name = "1k")]
    OneK,
    #[value(name = "2.5k")]
    TwoAndHalfK,
    #[value(name = "5k")]
    FiveK,
}

impl From<SizeArg> for SizePreset {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::OneK => SizePreset::OneK,
            SizeArg::TwoAndHalfK => SizePreset::TwoAndHalfK,
            SizeArg::FiveK => SizePreset::FiveK,
        }
    }
}

impl FilterArgs {
    /// The raw configuration these flags describe, without the filter file.
    pub fn to_config(&self) -> FilterConfig {
        let states = if self.tier1_states {
            TIER1_STATES.iter().map(|s| s.to_string()).collect()
        } else {
            self.states.clone()
        };
        let participant_min = match self.size {
            Some(size) => Some(Bound::from(SizePreset::from(size).min_participants())),
            None => self.participant_min.clone().map(Bound::Text),
        };
        FilterConfig {
            states,
            tiers: self.tiers.clone(),
            participant_min,
            participant_max: self.participant_max.clone().map(Bound::Text),
            segments: self.segments.clone(),
            search_text: self.search.clone(),
        }
    }

    /// Read the filter file (if any), layer the flags on top, and validate.
    pub fn to_spec(&self) -> anyhow::Result<FilterSpec> {
        let base = match &self.filter_file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading filter file {}", path.display()))?;
                FilterConfig::from_json(&json)
                    .with_context(|| format!("parsing filter file {}", path.display()))?
            }
            None => FilterConfig::default(),
        };
        let spec = base.merge(self.to_config()).validate()?;
        Ok(spec)
    }
}
