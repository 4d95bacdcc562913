//! CLI command implementations
//!
//! Every command reads its inputs from JSON files, runs one pure operation
//! and writes one JSON document to stdout. Workflow logs go to stderr.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::claim::Claim;
use crate::config::EngineConfig;
use crate::effect::{
    EffectProcessor, ElectionOutcome, ElectionRequest, InstrumentVersion, VersionId,
};
use crate::lifecycle::{lifecycle, LifecycleEvent, Reduction};
use crate::observability::{log_event_with_fields, Event};
use crate::observation::{Fixing, FixingTable};

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_json, read_json_or_default, write_response};

/// Claim tree with calendar dates, exact decimals and named assets
pub type DateClaim = Claim<NaiveDate, Decimal, String, String>;
pub type DateFixings = FixingTable<String, NaiveDate, Decimal>;

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Lifecycle {
            claim,
            events,
            fixings,
        } => write_response(&lifecycle_files(&claim, &events, fixings.as_deref())?),
        Command::Elect {
            claim,
            tag,
            time,
            history,
            fixings,
            counterparty,
            amount,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let request = ElectionRequest {
                elector: if counterparty { "counterparty" } else { "owner" }.to_string(),
                counterparty: if counterparty { "owner" } else { "counterparty" }.to_string(),
                elector_is_owner: !counterparty,
                tag,
                amount,
                time,
            };
            let outcome = elect_files(
                &config,
                &claim,
                history.as_deref(),
                fixings.as_deref(),
                &request,
            )?;
            write_response(&outcome)
        }
        Command::Hash { claim } => write_response(&hash_file(&claim)?),
        Command::Normalize { claim } => write_response(&normalize_file(&claim)?),
    }
}

fn load_fixings(path: Option<&Path>) -> CliResult<DateFixings> {
    let fixings: Vec<Fixing<String, NaiveDate, Decimal>> = read_json_or_default(path)?;
    Ok(FixingTable::from_fixings(fixings))
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let config = EngineConfig::load(path)?;
    if config.log_lifecycle {
        let path = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);
    }
    Ok(config)
}

/// `lifecycle`: apply events to a tree
pub fn lifecycle_files(
    claim: &Path,
    events: &Path,
    fixings: Option<&Path>,
) -> CliResult<Reduction<NaiveDate, Decimal, String, String>> {
    let claim: DateClaim = read_json(claim)?;
    let events: Vec<LifecycleEvent<NaiveDate>> = read_json(events)?;
    let oracle = load_fixings(fixings)?;
    Ok(lifecycle(&claim.normalize()?, &oracle, &events)?)
}

/// `elect`: reconstruct the current version, then apply one election
pub fn elect_files(
    config: &EngineConfig,
    claim: &Path,
    history: Option<&Path>,
    fixings: Option<&Path>,
    request: &ElectionRequest<NaiveDate, Decimal>,
) -> CliResult<ElectionOutcome<NaiveDate, Decimal, String, String>> {
    let inception = read_json::<DateClaim>(claim)?.normalize()?;
    let history: Vec<LifecycleEvent<NaiveDate>> = read_json_or_default(history)?;
    let oracle = load_fixings(fixings)?;

    let current = InstrumentVersion::reconstruct(&inception, &oracle, &history)?;
    let processor = EffectProcessor::new(config.clone())?;
    Ok(processor.process_election(&inception, &current, &oracle, request)?)
}

#[derive(Debug, Serialize)]
pub struct HashOutput {
    pub version: VersionId,
    pub nodes: usize,
}

/// `hash`: content address of a normalized tree
pub fn hash_file(claim: &Path) -> CliResult<HashOutput> {
    let claim = read_json::<DateClaim>(claim)?.normalize()?;
    Ok(HashOutput {
        version: VersionId::of(&claim)?,
        nodes: claim.node_count(),
    })
}

/// `normalize`: flatten a hand-written tree
pub fn normalize_file(claim: &Path) -> CliResult<DateClaim> {
    Ok(read_json::<DateClaim>(claim)?.normalize()?)
}
