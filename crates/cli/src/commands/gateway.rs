//! `sagealpha gateway` — Start the HTTP API server.

use sagealpha_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    config.validate().map_err(|e| format!("Invalid config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("SageAlpha Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Search configured: {}", config.is_search_configured());
    println!("   Generation configured: {}", config.is_generation_configured());

    sagealpha_gateway::start(config).await?;

    Ok(())
}
