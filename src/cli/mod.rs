//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the apidex
//! binary. The sort key for `list` is a plain string on purpose: an
//! unrecognized column degrades to filtered order instead of a usage error.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::stats::ProgressSort;

/// Personal public-API catalogue.
#[derive(Parser, Debug)]
#[command(name = "apidex", about = "Personal public-API catalogue", version)]
pub struct Cli {
    /// Dataset path or URL.
    #[arg(
        long,
        global = true,
        env = "APIDEX_DATA",
        default_value = "data/apis.json"
    )]
    pub data: String,

    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List entries matching filters, as a sorted table.
    List {
        /// Free-text search over name and description.
        search: Option<String>,

        /// Keep only entries in this category.
        #[arg(long)]
        category: Option<String>,

        /// Keep only entries with this auth value.
        #[arg(long)]
        auth: Option<String>,

        /// Keep only entries with this status.
        #[arg(long)]
        status: Option<String>,

        /// Column to sort by (name, category, auth, https, cors, status,
        /// date-checked). Unknown columns keep filtered order.
        #[arg(long, default_value = "name")]
        sort: String,

        /// Sort descending.
        #[arg(long)]
        desc: bool,
    },

    /// Show one entry in full.
    Show {
        /// Entry name (exact match first, then substring).
        name: String,

        /// Disambiguate by category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Fire an entry's try-it request and render the outcome.
    Try {
        /// Entry name (exact match first, then substring).
        name: String,

        /// Override a placeholder value, as key=value. Repeatable.
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Print the resolved URL without dispatching.
        #[arg(long)]
        preview: bool,

        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Disambiguate by category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Probe every working entry's try-it endpoint.
    Check {
        /// Check only entries in this category.
        #[arg(long, short)]
        category: Option<String>,

        /// Per-request timeout in seconds.
        #[arg(long, short, default_value_t = 10)]
        timeout: u64,

        /// Mark failing entries as broken and save the dataset.
        #[arg(long)]
        fix: bool,

        /// Show response details for passing probes too.
        #[arg(long, short)]
        verbose: bool,
    },

    /// Update an entry's status, notes, or try-it config.
    Update {
        /// Entry name (exact match first, then substring).
        name: String,

        /// New status value.
        #[arg(long, value_parser = ["pending", "working", "broken", "paid-only", "needs-key", "skipped"])]
        status: Option<String>,

        /// Testing notes (overwrites existing).
        #[arg(long)]
        notes: Option<String>,

        /// Try-it endpoint URL.
        #[arg(long)]
        try_url: Option<String>,

        /// Try-it response type.
        #[arg(long, value_parser = ["json", "image", "text"])]
        try_type: Option<String>,

        /// Try-it params as a JSON object, e.g. '{"code": "200"}'.
        #[arg(long)]
        try_params: Option<String>,

        /// Set try-it to null.
        #[arg(long)]
        clear_tryit: bool,

        /// Disambiguate by category.
        #[arg(long)]
        category: Option<String>,

        /// Preview changes without writing.
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Progress dashboard over the catalogue.
    Stats {
        /// Show detail for a single category.
        #[arg(long, short)]
        category: Option<String>,

        /// Filter to one auth type first.
        #[arg(long, short)]
        auth: Option<String>,

        /// Order for the category table.
        #[arg(long, value_enum, default_value_t = ProgressSort::Name)]
        sort: ProgressSort,

        /// Suggest categories closest to completion.
        #[arg(long, short)]
        next: bool,

        /// List pending entries (requires --category).
        #[arg(long, short)]
        pending: bool,
    },

    /// Parse the upstream markdown list into a dataset file.
    Parse {
        /// Markdown file to parse.
        input: PathBuf,

        /// Where to write the dataset (defaults to the --data path).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite even if the existing dataset has tested entries.
        #[arg(long)]
        force: bool,
    },

    /// Validate the dataset before commit.
    Validate,
}

/// Parse a `key=value` CLI argument.
fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
