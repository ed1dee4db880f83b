use crate::lookup::{run_search, run_subject, SearchArgs, SubjectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gtdn::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "gtdn-api",
    about = "Serve the GTDN registry API or query ARES from the command line",
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
    /// Query the ARES registry directly
    Ares {
        #[command(subcommand)]
        command: AresCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AresCommand {
    /// Search economic subjects by ICO, name or location
    Search(SearchArgs),
    /// Show one economic subject by ICO
    Subject(SubjectArgs),
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
        Command::Ares {
            command: AresCommand::Search(args),
        } => run_search(args).await,
        Command::Ares {
            command: AresCommand::Subject(args),
        } => run_subject(args).await,
    }
}
