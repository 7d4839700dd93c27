//! `sagealpha query` — One-shot retrieval-augmented question.

use sagealpha_chat::ChatEngine;
use sagealpha_config::AppConfig;
use sagealpha_gateway::turn_options;

pub async fn run(text: &str, top_k: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    config.validate().map_err(|e| format!("Invalid config: {e}"))?;

    let search = sagealpha_providers::build_search_provider(&config);
    let generation = sagealpha_providers::build_generation_provider(&config);

    let engine = ChatEngine::new(search, generation).with_options(turn_options(&config));

    let outcome = engine.one_shot(text, top_k).await?;

    println!("{}\n", outcome.answer);
    if !outcome.citations.is_empty() {
        println!("Sources:");
        for citation in &outcome.citations {
            let source = citation.source.as_deref().unwrap_or(&citation.doc_id);
            println!("  - {} (score {:.2})", source, citation.score);
        }
    }

    Ok(())
}
