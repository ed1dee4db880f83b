mod cli;
mod infra;
mod lookup;
mod routes;
mod server;

use gtdn::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
