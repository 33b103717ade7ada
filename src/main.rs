mod cli;
mod client;
mod config;
mod dto;
mod error;
mod llm;
mod server;
mod store;
mod text;
mod transcriber;
mod youtube;

use anyhow::Result;
use clap::Parser;
use log::error;

use cli::{Cli, Commands};
use config::{ClientConfig, ServiceConfig};

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = ServiceConfig::from_env().inspect_err(|e| {
                error!("Invalid configuration: {e}");
            })?;
            server::run_server(host, port, config).await
        }
        Commands::Transcribe {
            video_id,
            server_url,
        } => client::run_transcribe(ClientConfig::new(server_url), &video_id).await,
        Commands::List { server_url } => client::run_list(ClientConfig::new(server_url)).await,
        Commands::Delete {
            video_id,
            server_url,
        } => client::run_delete(ClientConfig::new(server_url), &video_id).await,
    }
}
