use anyhow::{Context, Result};
use std::io::Read;
use tracing_subscriber::{self, EnvFilter};

use optpos::config::EngineConfig;
use optpos::server::{self, ToolRequest};

const USAGE: &str = "usage: optpos [--schema | <request.json>]  (reads the request from stdin when no file is given)";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let arg = std::env::args().nth(1);
    let input = match arg.as_deref() {
        Some("--schema") => {
            let schema = schemars::schema_for!(ToolRequest);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }
        Some("-h" | "--help") => {
            eprintln!("{USAGE}");
            return Ok(());
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let config = EngineConfig::from_env()?;
    tracing::info!(
        risk_free_rate = config.pricing.risk_free_rate,
        num_points = config.simulation.num_points,
        "engine configured"
    );

    let response = server::handle_json(&input, &config, chrono::Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
