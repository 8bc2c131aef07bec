#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use instill_config::{
    cli::{Cli, Commands},
    config::{io::FsIo, parse_config, Config},
    paths::{Environment, ResolvedPaths},
};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.debug, cli.trace);

    let mut env = Environment::from_process();
    env.config_dir_override = cli.config_dir.filter(|dir| !dir.as_os_str().is_empty());
    debug!("Resolving directories from {env:?}");

    dispatch_command(cli.command, &env)
}

/// Initialize tracing with the specified debug/trace flags
fn initialize_tracing(debug: bool, trace: bool) {
    let log_level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy())
        .init();
}

fn dispatch_command(command: Commands, env: &Environment) -> Result<()> {
    let paths = ResolvedPaths::resolve(env);
    match command {
        Commands::Paths { json } => run_paths(&paths, json),
        Commands::Migrate => {
            paths.migrate_if_needed(env);
            let cfg = load(&paths)?;
            println!("Configuration ready at {}", cfg.path().display());
            Ok(())
        },
        Commands::Get { key, host } => {
            paths.migrate_if_needed(env);
            let cfg = load(&paths)?;
            match cfg.get(&host, &key) {
                Some(value) => {
                    println!("{value}");
                    Ok(())
                },
                None => anyhow::bail!("{key} is not set"),
            }
        },
        Commands::Set { key, value, host } => {
            paths.migrate_if_needed(env);
            let mut cfg = load(&paths)?;
            cfg.set(&host, &key, &value);
            cfg.write().with_context(|| format!("Failed to save {}", cfg.path().display()))
        },
        Commands::Hosts => {
            paths.migrate_if_needed(env);
            for host in load(&paths)?.hosts() {
                println!("{host}");
            }
            Ok(())
        },
    }
}

fn run_paths(paths: &ResolvedPaths, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(paths).context("Failed to encode paths")?);
    } else {
        println!("config: {}", paths.config_dir.display());
        println!("state:  {}", paths.state_dir.display());
        println!("data:   {}", paths.data_dir.display());
    }
    Ok(())
}

fn load(paths: &ResolvedPaths) -> Result<Config<'static>> {
    let files = paths.config_files();
    parse_config(&FsIo, &files)
        .with_context(|| format!("Failed to load configuration from {}", files.config.display()))
}
