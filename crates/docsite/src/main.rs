#![allow(unused)]

use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod dirs;
mod error;
mod init;
mod prelude;
mod render;
mod server;
mod store;
mod views;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Serve package documentation pages from a SQLite catalog"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to the SQLite catalog
    #[clap(long, env = "DOCSITE_DB", global = true, default_value = "docsite.db")]
    db: PathBuf,

    /// TOML file with display limits (page sizes, link counts, count caps)
    #[clap(long, env = "DOCSITE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "DOCSITE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Start the documentation web server
    Serve(crate::server::ServeOptions),

    /// Print the directory tree below a unit
    Dirs(crate::dirs::DirsOptions),

    /// Create the catalog schema and optionally load fixtures
    Init(crate::init::InitOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(options) => crate::server::run(options, app.global).await,
        SubCommands::Dirs(options) => crate::dirs::run(options, app.global).await,
        SubCommands::Init(options) => crate::init::run(options, app.global).await,
    }
}
