#![cfg(not(tarpaulin_include))]

use contact_upload::app;
use contact_upload::config::Config;

/// Main entry point for the contact upload page
///
/// Reads `API_BASE_URL` (and optionally `LISTEN_ADDR`) from the environment
/// or a `.env` file, then serves the upload page until interrupted.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    app::run(config).await?;

    Ok(())
}
