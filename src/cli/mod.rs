use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Lightweight web console for Docker Compose projects")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web console
    Serve {
        /// Address to bind (default: localhost)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (default: 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug mode
        #[arg(long)]
        debug: bool,

        /// Enable verbose logging
        #[arg(short, long, conflicts_with = "quiet")]
        verbose: bool,

        /// Only log warnings and errors
        #[arg(short, long)]
        quiet: bool,

        /// URL prefix to mount the console under
        #[arg(long)]
        base_url: Option<String>,

        /// Configuration file path (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Compose file, repeatable; files merge left to right
        #[arg(short = 'f', long = "compose-file")]
        compose_files: Vec<String>,

        /// Directory compose files are resolved against
        #[arg(short = 'w', long)]
        working_dir: Option<PathBuf>,
    },
}
