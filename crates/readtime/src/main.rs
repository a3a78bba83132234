//! readtime CLI
#![deny(unsafe_code)]

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use readtime::{Cli, Commands, commands};
use readtime_core::config::ConfigLoader;
use std::path::PathBuf;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = utf8(cwd, "current directory")?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        loader = loader.with_file(utf8(config_path.clone(), "config path")?);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let options_path = match cli.options {
        Some(path) => Some(utf8(path, "option store path")?),
        None => config.options_path(),
    };
    let require_store = || {
        options_path.as_deref().context(
            "cannot locate the option store; pass --options or set options_file in the config",
        )
    };
    let max_input = config.input_limit();

    let result = match command {
        Commands::Estimate(args) => {
            commands::estimate::cmd_estimate(args, cli.json, require_store()?, max_input)
        }
        Commands::Render(args) => {
            commands::render::cmd_render(args, cli.json, require_store()?, max_input)
        }
        Commands::Settings(args) => {
            commands::settings::cmd_settings(args, cli.json, require_store()?)
        }
        Commands::Info(args) => commands::info::cmd_info(
            args,
            cli.json,
            &config,
            &config_sources,
            options_path.as_deref(),
        ),
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

fn utf8(path: PathBuf, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| anyhow::anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}
