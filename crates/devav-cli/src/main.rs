//! `devav-migrate`: runs the staged DevAV import against in-memory stores

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use devav_import::{
    CloneReport, Cloner, ImportRegistry, Migration, MigrationConfig, MigrationReport,
    OrderAggregate, QuoteAggregate,
};
use devav_model::EntityKind;
use devav_store::{MemorySourceStore, MemoryTargetStore, SourceSnapshot};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("devav-migrate")
        .version(devav_import::VERSION)
        .about("Staged import of the legacy DevAV dataset")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("plan").about("Print the import stage plan"))
        .subcommand(
            Command::new("import")
                .about("Import a source snapshot into an in-memory target store")
                .arg(
                    Arg::new("snapshot")
                        .long("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON source snapshot"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML migration config"),
                )
                .arg(
                    Arg::new("clone")
                        .long("clone")
                        .action(ArgAction::SetTrue)
                        .help("Clone every order and quote by the configured factor after the import"),
                )
                .arg(
                    Arg::new("clone-factor")
                        .long("clone-factor")
                        .value_parser(value_parser!(usize))
                        .help("Override the clone factor; implies --clone"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the report as JSON"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("plan", _)) => {
            let plan = ImportRegistry::with_defaults().plan()?;
            print!("{plan}");
            Ok(())
        }
        Some(("import", args)) => import(args).await,
        _ => anyhow::bail!("unknown subcommand"),
    }
}

async fn import(args: &ArgMatches) -> Result<()> {
    let snapshot_path = args
        .get_one::<PathBuf>("snapshot")
        .context("--snapshot is required")?;
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => MigrationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MigrationConfig::default(),
    };
    let clone_factor = args.get_one::<usize>("clone-factor").copied();
    if let Some(factor) = clone_factor {
        config = config.with_clone_factor(factor);
    }
    let run_cloner = args.get_flag("clone") || clone_factor.is_some();

    let snapshot = SourceSnapshot::load(snapshot_path)
        .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;
    info!(records = snapshot.len(), path = %snapshot_path.display(), "snapshot loaded");

    let source = Arc::new(MemorySourceStore::new(snapshot));
    let target = Arc::new(MemoryTargetStore::new());
    let migration = Migration::new(config.clone());
    let report = migration
        .run(target.clone(), source)
        .await
        .with_context(|| format!("migration stopped in state {}", migration.state()))?;

    let mut clones = Vec::new();
    if run_cloner {
        let cloner =
            Cloner::new(target.clone()).with_date_shift_days(config.clone_date_shift_days);
        clones.push(
            cloner
                .clone_aggregates::<OrderAggregate>(config.clone_factor)
                .await?,
        );
        clones.push(
            cloner
                .clone_aggregates::<QuoteAggregate>(config.clone_factor)
                .await?,
        );
    }

    if args.get_flag("json") {
        let out = serde_json::json!({
            "import": report,
            "clones": clones,
            "version": target.version(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_summary(&report, &clones, &target);
    }
    Ok(())
}

fn print_summary(report: &MigrationReport, clones: &[CloneReport], target: &MemoryTargetStore) {
    println!("Migration Report:");
    for stage in &report.stages {
        let kinds: Vec<&str> = stage.kinds.iter().map(|k| k.name()).collect();
        println!(
            "  L{}: {} records, {} created ({})",
            stage.level,
            stage.records(),
            stage.receipt.total(),
            kinds.join(", ")
        );
    }
    println!("  Records read: {}", report.records());
    println!("  Entities created: {}", report.entities_created());
    println!("  Elapsed: {}ms", report.elapsed.as_millis());

    for clone in clones {
        println!(
            "  Cloned {}: {} parents, {} children from {} originals",
            clone.parent, clone.parents_created, clone.children_created, clone.source_parents
        );
    }

    println!("Target store (version {}):", target.version());
    for kind in EntityKind::ALL {
        let count = target.committed_count(kind);
        if count > 0 {
            println!("  {kind}: {count}");
        }
    }
}
