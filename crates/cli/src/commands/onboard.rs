//! `sagealpha onboard` — First-time setup.

use sagealpha_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("SageAlpha — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    } else {
        println!("Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\nConfig already exists at: {}", config_path.display());
        println!("Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("Created config.toml at: {}", config_path.display());
        println!("\nNext steps:");
        println!("   1. Edit {} and add your Azure credentials", config_path.display());
        println!("      (or set AZURE_OPENAI_* / AZURE_SEARCH_* environment variables)");
        println!("   2. Run: sagealpha gateway");
        println!("   3. Or try: sagealpha query \"who is the CEO of Cupid Limited\"\n");
    }

    Ok(())
}
