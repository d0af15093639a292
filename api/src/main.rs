use clap::{Parser, Subcommand};

mod cmd;

#[derive(Debug, Parser)]
#[clap(version, about = "Trip planner server and admin tools")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web server
    Server(trip_planner_api::config::Config),
    /// Administrative commands that work directly against the database
    Admin(cmd::admin::AdminArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    color_eyre::install()?;
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(config) => cmd::server::run(config).await?,
        Commands::Admin(args) => cmd::admin::admin_commands(args).await?,
    }

    Ok(())
}
