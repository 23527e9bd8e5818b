use std::error::Error;

use ai_llm_service::{config::default_config::config_groq_chat, telemetry};
use api::{ApiConfig, AppState};
use tracing::{debug, info};
use wellness_relay::Relay;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file if present.
    // A missing file is fine; an unreadable or invalid one is not.
    let dotenv = dotenvy::dotenv();

    telemetry::init("info")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => debug!("no .env file, using process environment"),
        Err(e) => return Err(e.into()),
    }

    let llm = config_groq_chat()?;
    info!(
        provider = ?llm.provider,
        model = %llm.model,
        endpoint = %llm.endpoint,
        timeout_secs = llm.timeout().as_secs(),
        "chat model configured"
    );

    let relay = Relay::from_config(llm)?;
    let config = ApiConfig::from_env()?;

    api::start(config, AppState::new(relay)).await?;

    Ok(())
}
