//! Command-line interface for listing a wallet's reconciled file index.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chainfiles_core::{FilterOp, FilterSpec, SortDirection, SortSpec};
use chainfiles_engine::{FetchSettings, ReconcileOptions};
use clap::Parser;
use url::Url;

use crate::settings::AppDefaults;

#[derive(Parser, Debug, Clone)]
#[command(name = "chainfiles", about = "List the files visible to a wallet address")]
pub struct Cli {
    /// Wallet address whose visible files are listed
    pub address: String,

    /// Ledger query service endpoint (overrides the persisted default)
    #[arg(long, env = "CHAINFILES_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Field to filter on (entry field, metadata field, or any blob field)
    #[arg(long, requires = "filter_value")]
    pub filter_field: Option<String>,

    /// Value the filter compares against (case-insensitive)
    #[arg(long, requires = "filter_field")]
    pub filter_value: Option<String>,

    /// Filter operator: equals, contains, starts-with, ends-with
    #[arg(long, default_value = "contains")]
    pub filter_op: FilterOp,

    /// Field to sort by (stable; missing values sort last ascending)
    #[arg(long)]
    pub sort_field: Option<String>,

    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    pub sort_dir: SortDirection,

    /// Records requested per ledger page (clamped to 1..=100)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Stop each feed after this many pages (default: paginate to the end)
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Emit the result as a JSON array instead of a table
    #[arg(long)]
    pub json: bool,

    /// Enable debug-level logging
    #[arg(long)]
    pub debug: bool,

    /// Additionally write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Persist the effective endpoint and page size as defaults
    #[arg(long)]
    pub save_defaults: bool,
}

impl Cli {
    pub fn endpoint(&self, defaults: &AppDefaults) -> Result<Url> {
        let raw = self.endpoint.as_deref().unwrap_or(&defaults.endpoint);
        Url::parse(raw).with_context(|| format!("invalid endpoint url: {raw}"))
    }

    pub fn reconcile_options(&self, defaults: &AppDefaults) -> ReconcileOptions {
        let filter_by = match (&self.filter_field, &self.filter_value) {
            (Some(field), Some(value)) => Some(FilterSpec {
                field: field.clone(),
                value: value.clone(),
                op: self.filter_op,
            }),
            _ => None,
        };
        let sort_by = self.sort_field.as_ref().map(|field| SortSpec {
            field: field.clone(),
            direction: self.sort_dir,
        });

        ReconcileOptions {
            filter_by,
            sort_by,
            fetch: FetchSettings {
                page_size: self.page_size.unwrap_or(defaults.page_size),
                max_pages: self.max_pages,
                ..FetchSettings::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_and_sort_flags_build_specs() {
        let cli = Cli::parse_from([
            "chainfiles",
            "0xme",
            "--filter-field",
            "name",
            "--filter-value",
            "report",
            "--filter-op",
            "starts-with",
            "--sort-field",
            "name",
            "--sort-dir",
            "desc",
        ]);
        let options = cli.reconcile_options(&AppDefaults::default());

        let filter = options.filter_by.unwrap();
        assert_eq!(filter.field, "name");
        assert_eq!(filter.op, FilterOp::StartsWith);
        let sort = options.sort_by.unwrap();
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn page_size_falls_back_to_persisted_default() {
        let cli = Cli::parse_from(["chainfiles", "0xme"]);
        let defaults = AppDefaults {
            page_size: 25,
            ..AppDefaults::default()
        };

        let options = cli.reconcile_options(&defaults);
        assert_eq!(options.fetch.page_size, 25);
        assert!(options.filter_by.is_none());
        assert!(options.sort_by.is_none());
    }
}
