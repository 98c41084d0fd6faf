use anyhow::Result;

use timeline_reply_bot::utils::logging;
use timeline_reply_bot::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // credentials may live in a .env next to the binary
    dotenvy::dotenv().ok();

    let log_file = logging::run_log_file_name();
    logging::init(&log_file)?;

    let config = Config::from_env();

    App::initialize(config).await?.run().await?;

    Ok(())
}
