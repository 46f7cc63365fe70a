use crate::demo::{run_catalog_import, run_demo, run_recommend, CatalogImportArgs, RecommendArgs};
use crate::server;
use card_advisor::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Card Advisor",
    about = "Serve and explore credit card recommendations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank catalog cards for a set of criteria and print the top suggestions
    Recommend(RecommendArgs),
    /// Inspect catalog exports
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Walk through recommendations, catalog admin, and chat against the sample catalog
    Demo,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Parse a catalog CSV export and summarise what would be seeded
    Import(CatalogImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Catalog {
            command: CatalogCommand::Import(args),
        } => run_catalog_import(args),
        Command::Demo => run_demo(),
    }
}
