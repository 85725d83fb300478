use crate::prelude::*;
use clap::Parser;

mod clean;
mod error;
mod prelude;
mod routes;
mod service;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Read API for hadith collections, books, chapters and narrations"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to the SQLite database
    #[clap(
        long,
        env = "HADITH_DATABASE",
        global = true,
        default_value = "hadith.db"
    )]
    database: String,

    /// Whether to display additional information.
    #[clap(long, env = "HADITH_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Serve the read API over HTTP
    Serve(crate::routes::ServeOptions),

    /// Run stored text through one of the cleanup variants
    Clean(crate::clean::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(options) => crate::routes::run(options, app.global).await,
        SubCommands::Clean(sub_app) => crate::clean::run(sub_app, app.global),
    }
}
