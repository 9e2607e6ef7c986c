mod cli;
mod commands;
mod render;

use jobtrack::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
