use anyhow::Context;
use clap::Parser;
use dreamnet::config::brain::discover_brains;
use dreamnet::utils::logger;
use dreamnet::utils::monitor::SessionStats;
use dreamnet::{
    BatchRunner, DreamConfig, DreamEngine, DreamRecorder, LocalStorage, ModelInvoker,
    OfflineInvoker, OllamaCommand,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "dream-batch")]
#[command(about = "Dream every brain*.json file in a directory")]
struct Args {
    /// Directory holding the brain files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Only files whose name starts with this prefix
    #[arg(long, default_value = "brain")]
    prefix: String,

    /// JSON or TOML configuration; built-in themes are used when absent
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[arg(long, default_value = ".")]
    output_dir: String,

    /// Pause between two dreams, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pause_ms: u64,

    #[arg(long)]
    seed: Option<u64>,

    /// Skip the model and use the rule-based generator
    #[arg(long)]
    offline: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let brains = discover_brains(&args.dir, &args.prefix)
        .with_context(|| format!("Failed to list brain files in {}", args.dir.display()))?;
    if brains.is_empty() {
        anyhow::bail!(
            "No {}*.json brain files found in {}",
            args.prefix,
            args.dir.display()
        );
    }

    let dream_config = DreamConfig::load_or_builtin(Some(args.config.as_path()));
    let model: Box<dyn ModelInvoker> = if args.offline {
        Box::new(OfflineInvoker)
    } else {
        Box::new(OllamaCommand::from_config(&dream_config.model))
    };
    let engine = match args.seed {
        Some(seed) => DreamEngine::with_seed(&dream_config, model, seed),
        None => DreamEngine::new(&dream_config, model),
    };
    let recorder = DreamRecorder::new(
        LocalStorage::new(args.output_dir.clone()),
        engine.model().describe(),
    );

    let mut stats = SessionStats::new();
    let report = BatchRunner::new(&engine, &recorder)
        .with_pause(Duration::from_millis(args.pause_ms))
        .run(&brains, &mut stats)
        .await
        .context("Batch run failed")?;

    for entry in &report.entries {
        match (&entry.artifact, &entry.error) {
            (Some(artifact), None) => {
                println!("✅ {}: {} {} {}", entry.name, artifact.symbol, artifact.color, artifact.phrase)
            }
            (_, Some(error)) => println!("❌ {}: {}", entry.name, error),
            (None, None) => println!("❔ {}", entry.name),
        }
    }

    stats.log_summary();
    println!("\n{}", stats);

    if report.failed() > 0 {
        anyhow::bail!("{} of {} brain files failed", report.failed(), report.entries.len());
    }
    Ok(())
}
