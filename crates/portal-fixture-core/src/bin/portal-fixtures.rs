use anyhow::Context;
use clap::{Parser, Subcommand};
use portal_fixture_core::test_harness::InMemoryPortal;
use portal_fixture_core::{Feature, FixtureConfig, ScenarioRunner};
use portal_fixture_registry::EntityRegistry;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portal-fixtures", version, about = "Build portal fixtures from scenario files")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a feature file against an in-memory portal
    Run {
        /// Feature file
        file: PathBuf,
        /// TOML configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Account to seed before the run
        #[arg(long = "user", value_name = "NAME")]
        users: Vec<String>,
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a feature file and list its fixture blocks
    Check {
        /// Feature file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = match cli.command {
        Commands::Run {
            file,
            config,
            users,
            json,
        } => run(&file, config.as_deref(), &users, json),
        Commands::Check { file } => check(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
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

fn load_feature(file: &Path) -> anyhow::Result<Feature> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading feature file {}", file.display()))?;
    Feature::parse(&text).with_context(|| format!("parsing {}", file.display()))
}

fn run(file: &Path, config: Option<&Path>, users: &[String], json: bool) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => FixtureConfig::from_toml_file(path)?,
        None => FixtureConfig::default(),
    };
    let feature = load_feature(file)?;

    let mut portal = InMemoryPortal::new();
    for name in users {
        portal.add_account(name);
    }

    let mut runner = ScenarioRunner::new(config);
    for block in &feature.blocks {
        runner
            .run_block(&mut portal, block)
            .with_context(|| format!("{} block at line {}", block.kind, block.line))?;
    }

    let registry = runner.into_registry();
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.snapshot())?);
    } else {
        print_registry(&registry);
    }
    Ok(())
}

fn print_registry(registry: &EntityRegistry) {
    println!("Pages:");
    for page in registry.pages() {
        println!("  {} -> {}", page.title, page.url);
    }
    println!("Groups:");
    for group in registry.groups().iter() {
        println!("  [{}] {}", group.id, group.title);
    }
    println!("Datasets:");
    for dataset in registry.datasets().iter() {
        println!("  [{}] {} ({})", dataset.id, dataset.title, dataset.moderation_state);
    }
    println!("Resources:");
    for resource in registry.resources().iter() {
        match resource.dataset {
            Some(dataset) => println!("  [{}] {} -> dataset {}", resource.id, resource.title, dataset),
            None => println!("  [{}] {}", resource.id, resource.title),
        }
    }
}

fn check(file: &Path) -> anyhow::Result<()> {
    let feature = load_feature(file)?;
    for block in &feature.blocks {
        println!("line {:>4}: {} ({} rows)", block.line, block.kind, block.table.len());
    }
    println!(
        "{} blocks, {} rows, {} other steps",
        feature.blocks.len(),
        feature.row_count(),
        feature.skipped_steps
    );
    Ok(())
}
