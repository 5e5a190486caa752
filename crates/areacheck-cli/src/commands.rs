//! Implementations behind the CLI subcommands.

use anyhow::Result;
use areacheck_client::{parse_reply, AreaCheckClient};
use areacheck_server::config::{ServerConfig, TimestampFormat, DEFAULT_TIMEZONE};
use areacheck_server::HttpServer;
use std::io::Write;
use std::net::SocketAddr;

/// Environment variable consulted when `--timezone` is absent.
pub const TIMEZONE_ENV: &str = "AREACHECK_TIMEZONE";

/// Validates that a URL string starts with http://
///
/// # Errors
///
/// Returns an error naming `description` if the prefix is missing.
pub fn validate_http_url(url: &str, description: &str) -> Result<()> {
    if url.starts_with("http://") {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Invalid {}: '{}' must start with http://",
            description,
            url
        ))
    }
}

/// Picks the timestamp zone: CLI flag, then environment, then the default.
pub fn resolve_timezone(flag: Option<String>, env: Option<String>) -> String {
    flag.or(env)
        .filter(|zone| !zone.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
}

/// Builds the server configuration from raw CLI values.
pub fn server_config(bind: &str, timezone: &str, max_history: usize) -> Result<ServerConfig> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address {}: {}", bind, e))?;
    if max_history == 0 {
        anyhow::bail!("--max-history must be at least 1");
    }
    let timestamps = TimestampFormat::with_zone_name(timezone.trim())?;

    Ok(ServerConfig::default()
        .with_bind(addr)
        .with_history_capacity(max_history)
        .with_timestamps(timestamps))
}

/// Runs the server until Ctrl-C.
pub async fn run_serve(config: ServerConfig) -> Result<()> {
    tracing::info!("Binding to: {}", config.bind);
    tracing::info!("Timestamp zone: {}", config.timestamps.zone());
    tracing::info!("History capacity: {}", config.history_capacity);

    HttpServer::new(config)
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}

/// Executes the `check` subcommand.
///
/// Writes the raw reply to `out`, then fails if the server rejected the point.
pub async fn run_check(out: &mut impl Write, server_address: &str, x: &str, y: &str, r: &str) -> Result<()> {
    validate_http_url(server_address, "server address")?;
    let client = AreaCheckClient::new(server_address)?;
    let raw = client.check_raw(x, y, r).await?;
    finish(out, &raw)
}

/// Executes the `clear` subcommand.
pub async fn run_clear(out: &mut impl Write, server_address: &str) -> Result<()> {
    validate_http_url(server_address, "server address")?;
    let client = AreaCheckClient::new(server_address)?;
    let raw = client.clear_raw().await?;
    finish(out, &raw)
}

fn finish(out: &mut impl Write, raw: &str) -> Result<()> {
    writeln!(out, "{}", raw)?;
    out.flush()?;
    parse_reply(raw)?;
    Ok(())
}
