use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

/// Fetch global security advisories from the GitHub REST API
#[derive(Parser)]
#[command(name = "ghadv", version, arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch global security advisories from GitHub
    FetchAdvisories(FetchArgs),
}

#[derive(Args)]
pub struct FetchArgs {
    /// Ecosystem filter (e.g. npm, pip, rubygems)
    #[arg(long)]
    pub ecosystem: Option<String>,

    /// Severity filter (e.g. low, medium, high, critical)
    #[arg(long)]
    pub severity: Option<String>,

    /// Advisory type filter (reviewed, unreviewed, malware)
    #[arg(long = "type", value_name = "TYPE")]
    pub advisory_type: Option<String>,

    /// Items per page (max 100)
    #[arg(long, default_value_t = 100)]
    pub per_page: u32,

    /// Safety limit on pages fetched; raise it for more data
    #[arg(long, default_value_t = 1)]
    pub max_pages: u32,

    /// Write results as JSON to this file; otherwise prints to stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn fetch_defaults() {
        let cli = Cli::try_parse_from(["ghadv", "fetch-advisories"]).unwrap();
        let Command::FetchAdvisories(args) = cli.command;
        assert_eq!(args.per_page, 100);
        assert_eq!(args.max_pages, 1);
        assert!(args.ecosystem.is_none());
        assert!(args.severity.is_none());
        assert!(args.advisory_type.is_none());
        assert!(args.out.is_none());
    }

    #[test]
    fn type_flag_maps_to_advisory_type() {
        let cli =
            Cli::try_parse_from(["ghadv", "fetch-advisories", "--type", "malware"]).unwrap();
        let Command::FetchAdvisories(args) = cli.command;
        assert_eq!(args.advisory_type.as_deref(), Some("malware"));
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["ghadv"]).is_err());
    }

    #[test]
    fn unknown_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["ghadv", "fetch-everything"]).is_err());
    }
}
