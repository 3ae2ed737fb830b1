//! `slotwise` command-line front end.

mod args;
mod render;

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};
use slotwise::{GspRegion, RunRequest, ScoreReport, Slotwise, SlotwiseConnector, TimeWindow};
use slotwise_elexon::{ElexonConfig, ElexonConnector};
use slotwise_mock::MockConnector;
use slotwise_octopus::{OctopusConfig, OctopusConnector};
use slotwise_openmeteo::{OpenMeteoConfig, OpenMeteoConnector};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands, FormatArg, ModeArg, RunArgs};
use crate::render::{CsvFormatter, TableFormatter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(&args, cli.mock).await,
        Commands::Regions => {
            print_regions();
            Ok(())
        }
    }
}

// RUST_LOG overrides; warnings only by default so tables stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn connectors(args: &RunArgs, mock: bool) -> Result<Vec<Arc<dyn SlotwiseConnector>>> {
    if mock {
        return Ok(vec![Arc::new(MockConnector::new())]);
    }
    let timeout = args.provider_timeout();
    let octopus = OctopusConnector::from_config(&OctopusConfig {
        timeout,
        ..OctopusConfig::default()
    })
    .context("creating Octopus client")?;
    let elexon = ElexonConnector::from_config(&ElexonConfig {
        timeout,
        source: args.system_source(),
        ..ElexonConfig::default()
    })
    .context("creating Elexon client")?;
    let weather = OpenMeteoConnector::from_config(&OpenMeteoConfig {
        timeout,
        ..OpenMeteoConfig::default()
    })
    .context("creating Open-Meteo client")?;
    Ok(vec![Arc::new(octopus), Arc::new(elexon), Arc::new(weather)])
}

async fn run(args: &RunArgs, mock: bool) -> Result<()> {
    let mut builder = Slotwise::builder()
        .scoring(args.scoring())
        .join_policy(args.join_policy())
        .provider_timeout(args.provider_timeout());
    if let Some(rank) = args.ranking() {
        builder = builder.ranking(rank);
    }
    for c in connectors(args, mock)? {
        builder = builder.with_connector(c);
    }
    let slotwise = builder.build().context("invalid configuration")?;

    let window = TimeWindow::next_hours(Utc::now(), args.hours)?;
    let mut req = RunRequest::new(&args.product, args.region, window)?;
    match args.location()? {
        Some(at) => req = req.at(at),
        None if args.mode == ModeArg::Preference => {
            tracing::warn!("no --lat/--lon given; weather terms use neutral defaults");
        }
        None => {}
    }

    let report = slotwise
        .run(&req)
        .await
        .with_context(|| format!("scoring tariff {}", req.tariff.tariff_code()))?;
    for w in &report.warnings {
        tracing::warn!("{w}");
    }
    emit(args, &report)
}

fn emit(args: &RunArgs, report: &ScoreReport) -> Result<()> {
    let tz = args.tz.zone();
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    match args.format {
        FormatArg::Table => out.write_all(TableFormatter::format_report(report, tz).as_bytes())?,
        FormatArg::Csv => {
            if let Some(msg) = render::status_message(&report.status) {
                eprintln!("{msg}");
            }
            CsvFormatter::write_report(report, tz, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn print_regions() {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Region", "Area"]);
    for r in GspRegion::ALL {
        table.add_row(vec![r.code(), r.description()]);
    }
    println!("{table}");
}
