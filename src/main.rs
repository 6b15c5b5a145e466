//! Afreken main entry point

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;

use afreken_config::Config;
use afreken_core::{run_batch, run_named, RunOutcome};
use afreken_ledger::{JsonFileLedger, MemoryLedger, SettlementRepository};
use afreken_rows::{CellValue, NamedFields, RowDecoder};
use afreken_utils::format_money;

#[derive(Parser, Debug)]
#[command(name = "afreken")]
#[command(version = "0.1.0")]
#[command(about = "Settlement extraction and reconciliation for rental back-office sheets", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Input JSON file: an array of sheet rows, or a named-field map
    /// with --legacy
    #[arg(required_unless_present = "init_config")]
    input: Option<PathBuf>,

    /// Treat the input as a legacy single-booking named-field map
    #[arg(long)]
    legacy: bool,

    /// Reason recorded on every settlement revision in this run
    #[arg(short, long, default_value = "batch run")]
    reason: String,

    /// Reconcile and report without touching the ledger file
    #[arg(long)]
    dry_run: bool,

    /// Print a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = if args.config.exists() {
        Config::load(args.config.clone())
            .with_context(|| format!("loading configuration from {}", args.config.display()))?
    } else {
        Config::default()
    };

    env_logger::Builder::from_default_env()
        .parse_filters(&config.logging.level)
        .init();

    let input = match &args.input {
        Some(path) => path,
        None => bail!("an input file is required"),
    };
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading input file {}", input.display()))?;

    let outcome = if args.legacy {
        let fields: NamedFields =
            serde_json::from_str(&raw).context("decoding legacy named-field input")?;
        run_named(&fields, &args.reason)?
    } else {
        let rows: Vec<Vec<CellValue>> =
            serde_json::from_str(&raw).context("decoding batch row input")?;
        let decoder = RowDecoder::new(config.reconciliation.default_vat_rate);
        run_batch(&rows, &decoder, &args.reason)?
    };

    let ledger: Box<dyn SettlementRepository> = if args.dry_run {
        Box::new(MemoryLedger::new())
    } else {
        if let Some(parent) = config.ledger.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating ledger directory {}", parent.display()))?;
        }
        Box::new(JsonFileLedger::open(&config.ledger.path)?)
    };

    report(&outcome, ledger.as_ref(), &config)?;

    if outcome.settlements.is_empty() {
        bail!("no bookings could be settled");
    }

    Ok(())
}

/// Append every settlement and print the run summary.
fn report(
    outcome: &RunOutcome,
    ledger: &dyn SettlementRepository,
    config: &Config,
) -> anyhow::Result<()> {
    let currency = &config.currency;
    for settlement in &outcome.settlements {
        let version = ledger.append(settlement.clone())?;
        println!(
            "{} v{}: net {} ({})",
            settlement.key,
            version,
            format_money(
                settlement.net_amount,
                &currency.symbol,
                &currency.thousands_separator,
                &currency.decimal_separator
            ),
            settlement.reason
        );
    }

    for warning in &outcome.warnings {
        println!("warning '{}': {}", warning.address, warning.message);
    }
    for skipped in &outcome.skipped_rows {
        println!("skipped row {}: [{}] {}", skipped.index, skipped.code, skipped.message);
    }
    for excluded in &outcome.excluded {
        println!("excluded '{}': [{}] {}", excluded.address, excluded.code, excluded.message);
    }

    println!(
        "{} settled, {} excluded, {} rows skipped",
        outcome.settlements.len(),
        outcome.excluded.len(),
        outcome.skipped_rows.len()
    );

    Ok(())
}
