mod cli;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use convoy::config::{AppConfig, ConfigFile, LoggingConfig};
use convoy::web;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve {
            host,
            port,
            debug,
            verbose,
            quiet,
            base_url,
            config,
            compose_files,
            working_dir,
        } => {
            let file = match &config {
                Some(path) => ConfigFile::load(path)?,
                None => ConfigFile::default(),
            };

            // A logging section in the config file wins; otherwise the
            // verbosity flags pick the level
            let logging = file.logging.clone().unwrap_or_else(|| LoggingConfig {
                level: if verbose {
                    "debug"
                } else if quiet {
                    "warn"
                } else {
                    "info"
                }
                .to_string(),
                json: false,
            });
            logging.init();

            let mut app = AppConfig::default();
            if let Some(host) = host.or(file.host) {
                app.host = host;
            }
            if let Some(port) = port.or(file.port) {
                app.port = port;
            }
            app.debug = debug || file.debug.unwrap_or(false);
            app.set_base_url(base_url.or(file.base_url));
            if !compose_files.is_empty() {
                app.compose_files = compose_files;
            } else if let Some(files) = file.compose_files.filter(|f| !f.is_empty()) {
                app.compose_files = files;
            }
            if let Some(dir) = working_dir.or(file.working_dir) {
                app.working_dir = dir;
            }

            info!("🚀 Convoy starting up...");
            info!(
                "Compose files: {:?} (in {})",
                app.compose_files,
                app.working_dir.display()
            );

            web::serve(Arc::new(app)).await?;
        }
    }

    Ok(())
}
