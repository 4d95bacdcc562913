//! CLI argument definitions using clap
//!
//! Commands:
//! - contingent lifecycle --claim <path> --events <path> [--fixings <path>]
//! - contingent elect --claim <path> --tag <tag> --time <date> ...
//! - contingent hash --claim <path>
//! - contingent normalize --claim <path>

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// contingent - lifecycle contingent claims deterministically
#[derive(Parser, Debug)]
#[command(name = "contingent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply time and election events to a claim tree
    Lifecycle {
        /// Claim tree (JSON)
        #[arg(long)]
        claim: PathBuf,

        /// Events in time order (JSON array)
        #[arg(long)]
        events: PathBuf,

        /// Observation fixings (JSON array of {id, time, value})
        #[arg(long)]
        fixings: Option<PathBuf>,
    },

    /// Apply one election to the current version of an instrument
    Elect {
        /// Claim tree at inception (JSON)
        #[arg(long)]
        claim: PathBuf,

        /// Tag of the chosen alternative
        #[arg(long)]
        tag: String,

        /// Election date (YYYY-MM-DD)
        #[arg(long)]
        time: NaiveDate,

        /// Events that changed the instrument since inception, in time
        /// order (JSON array)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Observation fixings (JSON array of {id, time, value})
        #[arg(long)]
        fixings: Option<PathBuf>,

        /// Elect as the counterparty instead of the owner
        #[arg(long)]
        counterparty: bool,

        /// Units of the instrument the election applies to
        #[arg(long, default_value = "1")]
        amount: Decimal,

        /// Engine configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the version id of a claim tree
    Hash {
        #[arg(long)]
        claim: PathBuf,
    },

    /// Print the normalized form of a claim tree
    Normalize {
        #[arg(long)]
        claim: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elect() {
        let cli = Cli::try_parse_from([
            "contingent",
            "elect",
            "--claim",
            "bond.json",
            "--tag",
            "CALLED",
            "--time",
            "2025-06-30",
            "--counterparty",
            "--amount",
            "250",
        ])
        .unwrap();
        match cli.command {
            Command::Elect {
                tag,
                time,
                counterparty,
                amount,
                history,
                ..
            } => {
                assert_eq!(tag, "CALLED");
                assert_eq!(time, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
                assert!(counterparty);
                assert_eq!(amount, Decimal::new(250, 0));
                assert!(history.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lifecycle_requires_events() {
        assert!(Cli::try_parse_from(["contingent", "lifecycle", "--claim", "c.json"]).is_err());
    }
}
