use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod app;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending migrations, then serve the HTTP API
    Serve {
        /// Address to listen on, overriding BIND_ADDRESS
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run pending migrations and exit
    Migrate,
    /// Replace every row with the demo data set
    Seed,
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { bind } => app::serve::main(bind).await,
        Commands::Migrate => app::migrate::main(),
        Commands::Seed => app::seed::main(),
    }
}
