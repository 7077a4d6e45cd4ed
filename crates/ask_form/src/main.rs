use anyhow::Context;
use ask_client::{config, logging};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ask-form", version, about = "Ask questions in an interactive terminal form")]
struct Args {
    /// Config file (default: $ASK_CONFIG, then ~/.ask/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref())?;
    let cfg = config::load_or_default(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let log_dir = cfg
        .log
        .directory
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| config::config_dir().map(|d| d.join("logs")))
        .unwrap_or_else(|| PathBuf::from("."));
    let _log_guard = logging::init_file(
        &log_dir,
        "ask-form.log",
        cfg.log.filter.as_deref().unwrap_or("info"),
    )
    .with_context(|| format!("failed to open log directory {}", log_dir.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let answerer = runtime
        .block_on(ask_client::connect_answerer(&cfg.endpoint))
        .with_context(|| format!("failed to reach {}", cfg.endpoint.url_or_default()))?;
    tracing::info!(transport = ?cfg.endpoint.transport, "answering service ready");

    ask_form_lib::run(answerer, runtime.handle().clone())?;
    Ok(())
}
