use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::error::{SynthError, SynthResult};
use crate::selection::SelectionKey;

#[derive(Debug, Parser)]
#[command(
    name = "digipine-synth",
    about = "deterministic market-intelligence snapshot generator"
)]
pub struct Args {
    /// Reference catalog (YAML). The built-in catalog is used when absent.
    #[arg(long, env = "DIGIPINE_CATALOG")]
    pub catalog: Option<PathBuf>,
    #[arg(long, env = "DIGIPINE_OUTPUT", default_value = "out")]
    pub output_dir: PathBuf,
    #[arg(long, env = "DIGIPINE_LABEL", default_value = "local")]
    pub label: String,
    /// Tracing filter directive, e.g. `info` or `digipine_synth=debug`.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Products,
    Regions,
    Platforms,
    Windows,
    Ranges,
    All,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct SelectionArgs {
    #[arg(long, default_value = "cocacola")]
    pub product: String,
    #[arg(long, default_value = "all")]
    pub region: String,
    #[arg(long = "window", default_value = "7days")]
    pub time_window: String,
    #[arg(long, default_value = "all")]
    pub platform: String,
    /// Last day of the timeline (YYYY-MM-DD); defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

impl SelectionArgs {
    pub fn key(&self) -> SelectionKey {
        SelectionKey::new(
            self.product.trim(),
            self.region.trim(),
            self.time_window.trim(),
            self.platform.trim(),
        )
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    List {
        #[arg(value_enum, default_value_t = ListTarget::All)]
        target: ListTarget,
    },
    Generate {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Fail on unknown products instead of using the default product.
        #[arg(long)]
        strict: bool,
        /// Skip the region and time-window bias.
        #[arg(long)]
        raw: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        #[arg(long, default_value = "sales")]
        metric: String,
        /// Also write a report under `<output-dir>/<label>/`.
        #[arg(long)]
        write: bool,
    },
    Markers {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    Sweep {
        #[arg(long, default_value_t = 128)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 2)]
        iterations: u32,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        write: bool,
    },
    Checkout {
        #[arg(long, default_value = "Growth")]
        plan: String,
        #[arg(long, default_value_t = 4999)]
        amount: u32,
        /// Payment mode: UPI, Card, NetBanking or Wallets.
        #[arg(long, default_value = "UPI")]
        mode: String,
        #[arg(long)]
        card_number: Option<String>,
    },
    Doctor,
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|error| format!("invalid date '{value}' (expected YYYY-MM-DD): {error}"))
}

pub fn validate_label(label: &str) -> SynthResult<()> {
    if label.is_empty() {
        return Err(SynthError::InvalidArgument(
            "label must not be empty".to_string(),
        ));
    }
    if matches!(label, "." | "..") {
        return Err(SynthError::InvalidArgument(format!(
            "label '{label}' is not allowed"
        )));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
    {
        return Err(SynthError::InvalidArgument(
            "label contains invalid characters; allowed: [A-Za-z0-9._-]".to_string(),
        ));
    }
    Ok(())
}
