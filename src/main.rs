//! yt-oauth2 CLI binary entry point.

use clap::Parser;
use yt_oauth2::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login => yt_oauth2::cli::handle_login().await,
        Commands::Status => yt_oauth2::cli::handle_status().await,
        Commands::Logout => yt_oauth2::cli::handle_logout().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
