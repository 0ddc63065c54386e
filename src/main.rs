use clap::Parser;
use dreamnet::config::brain::load_brain;
use dreamnet::utils::{logger, validation::Validate};
use dreamnet::{
    Brain, CliConfig, DreamConfig, DreamEngine, DreamError, DreamRecorder, LocalStorage,
    ModelInvoker, OfflineInvoker, OllamaCommand, ThemeCatalog,
};

fn exit_with(e: &DreamError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

/// `--intent`/`--style` first, then the brain file.
fn resolve_brain(config: &CliConfig) -> Result<Brain, DreamError> {
    if !config.needs_brain_file() {
        return Ok(Brain::new(
            config.intent.clone().unwrap_or_default(),
            config.style.clone().unwrap_or_default(),
        ));
    }

    let from_file = match load_brain(&config.brain) {
        Ok(brain) => brain,
        Err(e) if config.intent.is_some() || config.style.is_some() => {
            tracing::warn!("{}; using the inline values only", e);
            Brain::default()
        }
        Err(e) => return Err(e),
    };

    Ok(Brain::new(
        config.intent.clone().unwrap_or(from_file.intent),
        config.style.clone().unwrap_or(from_file.style),
    ))
}

fn print_themes(catalog: &ThemeCatalog) {
    println!("🎨 Available themes (default: {})", catalog.default_theme().name);
    for theme in catalog.themes() {
        println!("\n🎭 {}", theme.name.to_uppercase());
        println!("   Keywords: {}", theme.keywords.join(", "));
        println!("   Symbols: {}", theme.symbol_pool.len());
        println!("   Colors: {}", theme.color_pool.len());
    }
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("🌙 Dreamnet awakening...");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證參數
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let mut dream_config = DreamConfig::load_or_builtin(Some(config.config.as_path()));
    if let Some(model) = &config.model {
        dream_config.model.name = model.clone();
    }
    if let Some(timeout) = config.timeout {
        dream_config.model.timeout_seconds = timeout;
    }

    if config.list_themes {
        print_themes(&ThemeCatalog::from_config(&dream_config));
        return;
    }

    let brain = match resolve_brain(&config) {
        Ok(brain) => brain,
        Err(e) => exit_with(&e),
    };
    println!("📖 Intent: {}", brain.intent);
    println!("🎨 Style: {}", brain.style);

    let model: Box<dyn ModelInvoker> = if config.offline {
        Box::new(OfflineInvoker)
    } else {
        Box::new(OllamaCommand::from_config(&dream_config.model))
    };
    let engine = match config.seed {
        Some(seed) => DreamEngine::with_seed(&dream_config, model, seed),
        None => DreamEngine::new(&dream_config, model),
    };

    if config.dry_run {
        let preview = engine.preview(&brain);
        println!("🔍 Theme scores:");
        for (theme, score) in &preview.theme_scores {
            println!("   {:<16} {}", theme, score);
        }
        println!("🎭 Theme: {}", preview.theme);
        println!("💭 Concept: {}", preview.concept);
        println!("📜 Prompt:\n{}", preview.prompt);
        return;
    }

    println!("🔮 Consulting the oracle...");
    let outcome = engine.dream(&brain).await;
    let artifact = &outcome.artifact;
    println!("✨ Symbol: {}", artifact.symbol);
    println!("📝 Phrase: {}", artifact.phrase);
    println!("🎨 Color: {}", artifact.color);
    println!("🔍 Reasoning: {}", artifact.reasoning);
    println!("🧭 Source: {}", outcome.source.as_str());

    let recorder = DreamRecorder::new(
        LocalStorage::new(config.output_dir.clone()),
        engine.model().describe(),
    );
    match recorder.record(&outcome).await {
        Ok(paths) => {
            println!("💾 Results saved to {}", paths.output);
            println!("📋 Session logged to {}", paths.log);
            println!("🌊 Echo added to {}", paths.echo);
            println!("🌟 Dream complete.");
        }
        Err(e) => exit_with(&e),
    }
}
