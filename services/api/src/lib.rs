mod chat;
mod cli;
mod export;
mod infra;
mod routes;
mod server;

use agency_site::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
