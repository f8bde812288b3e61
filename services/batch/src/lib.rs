mod cli;
mod demo;
mod error;
mod loader;
mod telemetry;

pub use error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
