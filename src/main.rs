// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> BackendManager::bind(-C) --> dispatch
//!   Version | Options | ConfigFiles          (no repository)
//!   everything else                          cmd::repo
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use tracing::error;
use vcskit::backend::BackendContext;
use vcskit::cli::global::GlobalOptions;
use vcskit::cli::{self, Command};
use vcskit::cmd::config::{run_config_files_command, run_options_command};
use vcskit::cmd::output::Output;
use vcskit::cmd::repo::run_repo_command;
use vcskit::config::loader::ConfigLoader;
use vcskit::config::{CONFIG_FILE_NAME, Config};
use vcskit::logging::init_logging;
use vcskit::manager::BackendManager;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let loader = match build_config_loader(&cli.global) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let config_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&config.global.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let mut out = Output::new(&mut lock, cli.global.json);
    let result = dispatch_command(&cli, &config, &config_files, &mut out);
    let _ = lock.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch_command(
    cli: &cli::Cli,
    config: &Config,
    config_files: &[String],
    out: &mut Output<'_>,
) -> vcskit::error::Result<()> {
    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return Err(anyhow::anyhow!("No command specified"));
    };

    match command {
        Command::Version => out.emit(env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_VERSION")),
        Command::Options => run_options_command(config, out),
        Command::ConfigFiles => run_config_files_command(config_files, out),
        _ => {
            let mut manager = open_repository(cli, config)?;
            run_repo_command(command, &mut manager, out)
        }
    }
}

fn open_repository(cli: &cli::Cli, config: &Config) -> vcskit::error::Result<BackendManager> {
    let ctx = BackendContext::system(config.backends.settings());
    let mut manager = BackendManager::from_order(&config.backends.order, ctx)?;
    let directory = std::path::absolute(&cli.global.directory)
        .with_context(|| format!("Invalid directory {}", cli.global.directory.display()))?;
    manager.bind(Some(directory.as_path()))?;
    Ok(manager)
}

fn build_config_loader(global: &GlobalOptions) -> vcskit::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(CONFIG_FILE_NAME);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix("VCSKIT");
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}
