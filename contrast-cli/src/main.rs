//! contrast CLI — find the prompt fragment that drives an LLM response.
//!
//! Runs the greedy contrastive search against a configured
//! OpenAI-compatible endpoint and renders the outcome as a terminal
//! summary, JSON, or an HTML report.

mod report;

use clap::Parser;
use contrast_core::{
    AppConfig, ContrastSearch, InstructionInfiller, SearchOutcome, SearchParams, create_generator,
    load_config,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Contrastive explanations for LLM responses
#[derive(Parser, Debug)]
#[command(name = "contrast", version, about, long_about = None)]
struct Cli {
    /// Prompt to explain
    prompt: Option<String>,

    /// Read the prompt from a file instead of the command line
    #[arg(long, conflicts_with = "prompt")]
    prompt_file: Option<PathBuf>,

    /// Words per chunk
    #[arg(short = 'k', long)]
    split_k: Option<usize>,

    /// Acceptance threshold for the contrast score, in [0, 1]
    #[arg(short, long)]
    delta: Option<f64>,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL override for the API endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Workspace directory (for `.contrast/config.toml`)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Print the full outcome as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Write an HTML report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "contrast", "contrast")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "contrast.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = load_flag_adjusted_config(&cli, &workspace)?;
    config.search.validate()?;

    let prompt = resolve_prompt(&cli)?;

    let generator = create_generator(&config.llm)?;
    let infiller = Arc::new(InstructionInfiller::new(generator.clone()));
    let search = ContrastSearch::new(generator, infiller);

    let params = SearchParams::from(&config.search);
    let outcome = search.run(&prompt, &params).await?;

    if let Some(path) = &cli.report {
        std::fs::write(path, report::render_html(&outcome))?;
        tracing::info!(path = %path.display(), "HTML report written");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", report::render_summary(&outcome));
    }

    // Exhaustion is a valid outcome, distinct from failure.
    if matches!(outcome, SearchOutcome::Exhausted { .. }) {
        std::process::exit(2);
    }
    Ok(())
}

/// Layered config with CLI flags applied as the final override.
fn load_flag_adjusted_config(cli: &Cli, workspace: &std::path::Path) -> anyhow::Result<AppConfig> {
    let mut config = load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    if let Some(split_k) = cli.split_k {
        config.search.split_k = split_k;
    }
    if let Some(delta) = cli.delta {
        config.search.delta = delta;
    }
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.llm.base_url = Some(base_url.clone());
    }
    Ok(config)
}

fn resolve_prompt(cli: &Cli) -> anyhow::Result<String> {
    if let Some(prompt) = &cli.prompt {
        return Ok(prompt.clone());
    }
    if let Some(path) = &cli.prompt_file {
        return Ok(std::fs::read_to_string(path)?);
    }
    anyhow::bail!("No prompt given: pass it as an argument or via --prompt-file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_search_flags() {
        let cli = Cli::parse_from(["contrast", "a b c", "-k", "2", "--delta", "0.3", "--json"]);
        assert_eq!(cli.prompt.as_deref(), Some("a b c"));
        assert_eq!(cli.split_k, Some(2));
        assert_eq!(cli.delta, Some(0.3));
        assert!(cli.json);
    }

    #[test]
    fn test_resolve_prompt_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "from a file").unwrap();
        let cli = Cli::parse_from([
            "contrast",
            "--prompt-file",
            path.to_str().unwrap(),
        ]);
        assert_eq!(resolve_prompt(&cli).unwrap(), "from a file");
    }

    #[test]
    fn test_resolve_prompt_requires_input() {
        let cli = Cli::parse_from(["contrast"]);
        assert!(resolve_prompt(&cli).is_err());
    }
}
