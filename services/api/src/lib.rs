mod cli;
mod infra;
mod routes;
mod server;

use recruitment_apk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
