#![cfg(not(tarpaulin_include))]

use ctv_dashboard::app;

/// Main entry point for the dashboard web application
///
/// Initializes logging and runs the web server. The Sheets API key is read
/// from the credentials file named by `SHEETS_CREDENTIALS` (default
/// `credentials.json`); that is the only configuration the server takes.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    app::run("127.0.0.1:3000").await
}
