use anyhow::Result;
use axum::Router;
use clap::Parser;
use search_core::config::load_config;
use search_core::EngineConfig;
use server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Documents to load at startup (JSON / JSONL file or directory)
    #[arg(long)]
    input: Option<PathBuf>,
    /// JSON engine config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Whitespace separated stop words, overrides the config file
    #[arg(long)]
    stop_words: Option<String>,
    /// Maximum ranked results per query, overrides the config file
    #[arg(long)]
    max_results: Option<usize>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut engine = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(words) = &args.stop_words {
        engine.stop_words = words.split_whitespace().map(str::to_string).collect();
    }
    if let Some(max) = args.max_results {
        engine.max_results = max;
    }
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app: Router = build_app(AppConfig { engine, input: args.input, admin_token })?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
