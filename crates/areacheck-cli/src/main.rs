//! # AreaCheck CLI Entry Point
//!
//! Main binary for the AreaCheck service. Starts the HTTP server or makes
//! one-shot calls against a running one.
//!
//! ## Usage
//!
//! ```bash
//! # Start the server on the default address (0.0.0.0:8080)
//! areacheck serve
//!
//! # Start with timestamps in UTC and a shorter history
//! areacheck serve -b 127.0.0.1:9000 --timezone UTC --max-history 50
//!
//! # Evaluate a point (outputs raw JSON)
//! areacheck check http://127.0.0.1:8080 --x 1 --y -1 --r 2
//!
//! # Empty the history
//! areacheck clear http://127.0.0.1:8080
//! ```
//!
//! ## URL Format
//!
//! Server URLs must include the `http://` prefix:
//! - ✅ `http://127.0.0.1:8080`
//! - ❌ `127.0.0.1:8080`

use anyhow::Result;
use areacheck_cli::commands;
use areacheck_server::config::DEFAULT_BIND;
use areacheck_server::history::MAX_HISTORY;
use argh::FromArgs;

#[derive(FromArgs)]
/// AreaCheck - point-in-area hit testing over HTTP
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

/// Available CLI subcommands.
#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Serve(ServeArgs),
    Check(CheckArgs),
    Clear(ClearArgs),
}

/// Arguments for starting the server.
///
/// # Example
///
/// ```bash
/// AREACHECK_TIMEZONE=UTC areacheck serve -b 0.0.0.0:8080
/// ```
#[derive(FromArgs)]
#[argh(subcommand, name = "serve")]
/// start the AreaCheck HTTP server
struct ServeArgs {
    /// address to bind the HTTP server to
    ///
    /// Defaults to "0.0.0.0:8080".
    #[argh(option, short = 'b', default = "DEFAULT_BIND.to_string()")]
    bind: String,

    /// IANA timezone for record timestamps
    ///
    /// Falls back to the AREACHECK_TIMEZONE environment variable, then to
    /// Europe/Moscow.
    #[argh(option, long = "timezone")]
    timezone: Option<String>,

    /// number of records kept in the history (default 200)
    #[argh(option, long = "max-history", default = "MAX_HISTORY")]
    max_history: usize,
}

/// Arguments for evaluating a single point.
///
/// Coordinates are forwarded as text, exactly as given.
///
/// # Examples
///
/// ```bash
/// areacheck check http://127.0.0.1:8080 --x 1 --y -1 --r 2 | jq '.item.hit'
/// ```
#[derive(FromArgs)]
#[argh(subcommand, name = "check")]
/// evaluate a point on a running server
struct CheckArgs {
    /// address of the server (must start with http://)
    #[argh(positional)]
    server_address: String,

    /// x coordinate, in [-3, 3]
    #[argh(option)]
    x: String,

    /// y coordinate, in [-3, 5]
    #[argh(option)]
    y: String,

    /// scale of the area, in [1, 4]
    #[argh(option)]
    r: String,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "clear")]
/// clear the history of a running server
struct ClearArgs {
    /// address of the server (must start with http://)
    #[argh(positional)]
    server_address: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // check/clear keep stdout clean for piping to jq
    if matches!(cli.command, Commands::Serve(_)) {
        // Set default log level to INFO, but allow RUST_LOG env var to override
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting AreaCheck server");
            let timezone = commands::resolve_timezone(
                args.timezone,
                std::env::var(commands::TIMEZONE_ENV).ok(),
            );
            let config = commands::server_config(&args.bind, &timezone, args.max_history)?;
            commands::run_serve(config).await
        }
        Commands::Check(args) => {
            let mut stdout = std::io::stdout().lock();
            commands::run_check(&mut stdout, &args.server_address, &args.x, &args.y, &args.r).await
        }
        Commands::Clear(args) => {
            let mut stdout = std::io::stdout().lock();
            commands::run_clear(&mut stdout, &args.server_address).await
        }
    }
}
