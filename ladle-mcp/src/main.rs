//! Ladle MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Logs go to stderr; stdout carries
//! protocol messages only.
//!
//! Tools:
//! - get_unit, list_units: inspect the unit table
//! - to_base, from_base, convert: plain conversions
//! - convert_to_system: nicest metric/imperial representation of an amount
//! - scale_recipe, convert_recipe, validate_recipe: whole-recipe operations
//!
//! Environment:
//! - LADLE_DEFAULT_SYSTEM: metric (default) or imperial
//! - LADLE_LOG: log filter when RUST_LOG is unset (default "info")

mod config;
mod protocol;
mod tools;

use std::io::{self, BufRead, IsTerminal, Write};

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use protocol::{Server, PROTOCOL_VERSION, SERVER_VERSION};

fn init_tracing(config: &Config) {
    // Priority: RUST_LOG env var > LADLE_LOG > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(&config.log_filter)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_ansi(false))
        .with(filter)
        .init();
}

fn main() {
    let config = Config::from_env();
    init_tracing(&config);

    let server = Server::new(tools::standard_registry(), config);

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Ladle MCP server started");
    info!(default_system = %server.config.default_system, "configuration loaded");
    info!(
        stdin_terminal = io::stdin().is_terminal(),
        stdout_terminal = io::stdout().is_terminal(),
        "server ready, waiting for requests"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let Some(response) = server.handle_line(line) else {
                    continue;
                };

                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
}
