// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod demo;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use demo::LeadFaker;
use runtime::{ConsoleRuntime, SimulatedGateway, load_seed_dataset};
use seller_app::{AppCommand, AppState, LeadGateway, LoadState};
use seller_db::Store;
use std::env;
use std::path::PathBuf;

const DEMO_SEED: u64 = 2026;
const DEMO_LEAD_COUNT: usize = 30;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `seller --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or SELLER_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;

    let leads = if options.demo {
        LeadFaker::new(DEMO_SEED).dataset(DEMO_LEAD_COUNT)
    } else {
        load_seed_dataset(config.seed_path().as_deref())?
    };
    let latencies = config.latencies()?;

    if options.check_only {
        let mut gateway = SimulatedGateway::new(leads, latencies);
        let mut state = AppState::default();
        state.dispatch(AppCommand::BeginLoad);
        let loaded = gateway.load_leads().map_err(|error| format!("{error:#}"));
        state.dispatch(AppCommand::FinishLoad(loaded));
        if let LoadState::Failed(error) = &state.load {
            bail!("lead dataset failed to load: {error}");
        }
        println!("ok: {} leads", state.leads.len());
        return Ok(());
    }

    logging::init_logging(&config.log_dir()?, config.log_level())?;
    tracing::info!(
        db = %db_path.display(),
        leads = leads.len(),
        demo = options.demo,
        "starting seller"
    );

    let mut state = AppState::default();
    let mut runtime = ConsoleRuntime::new(SimulatedGateway::new(leads, latencies), &store);
    seller_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-path" => options.print_db_path = true,
            "--print-example-config" => options.print_example = true,
            "--demo" => options.demo = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("seller - lead triage console");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved preference database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with generated leads and in-memory preferences");
    println!("  --check                  Validate config, database and lead dataset, then exit");
    println!("  --help                   Show this help");
}
