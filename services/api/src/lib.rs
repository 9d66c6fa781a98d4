mod cli;
mod infra;
mod routes;
mod server;
mod view;

use asso_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
