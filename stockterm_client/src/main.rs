//! StockTerm is a terminal client that shows equity quotes from the Yahoo Finance
//! chart API and keeps a small watchlist of ticker symbols in `~/.stockterm`.
//!
//! Usage example (CLI):
//! ```bash
//! stockterm get AAPL,MSFT
//! stockterm add TSLA
//! stockterm get-all --range 5d
//! ```
//!
//! On startup a watchlist left at the legacy location `./ggs.config` is copied into
//! the config directory once. Ctrl+C stops a running fetch or editing session; a
//! second Ctrl+C before the first is handled exits immediately.
#![warn(missing_docs)]
mod args;
mod commands;
mod list_editor;
mod render;

use std::io::{self, IsTerminal, Write};
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use log::{info, warn};
use stockterm_common::fetcher::QuoteFetcher;
use stockterm_common::store::FileStore;
use stockterm_common::watchlist::WatchlistManager;
use stockterm_common::{Interrupt, Result, StockError};

use crate::args::Args;
use crate::commands::{Context, usage_text};
use crate::render::TableRenderer;

/// Exit code used when a second interrupt forces the process down.
const FORCED_EXIT_CODE: i32 = 130;

fn main() {
    init_logger();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    let Some(command) = args.command.clone() else {
        println!("{}", usage_text());
        process::exit(1);
    };

    if let Err(e) = run(&args, &command) {
        match e {
            StockError::InvalidCommand(_) => eprintln!("{}\n\n{}", e, usage_text()),
            _ => eprintln!("{}", e),
        }
        process::exit(1);
    }
}

fn run(args: &Args, command: &str) -> Result<()> {
    let config = args.config();
    info!("Using watchlist {}", config.watchlist_path.display());

    let store = FileStore::from_config(&config);
    if let Err(e) = store.migrate_legacy(&config.legacy_path) {
        eprintln!("Warning: Failed to migrate from legacy config: {}", e);
    }

    let interrupt = Interrupt::new();
    {
        let interrupt = interrupt.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            if !interrupt.trigger() {
                process::exit(FORCED_EXIT_CODE);
            }
        }) {
            warn!("Error setting Ctrl+C handler: {}", e);
        }
    }

    let ctx = Context {
        fetcher: QuoteFetcher::from_config(&config)?,
        manager: WatchlistManager::new(store),
        renderer: TableRenderer::new(use_color()),
        input: list_editor::stdin_lines(),
        interrupt,
        config,
    };

    let mut stdout = io::stdout().lock();
    commands::execute(&ctx, command, args.tickers.as_deref(), &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn init_logger() {
    default_logger().parse_default_env().init();
}

/// Logger before `RUST_LOG` is applied.
fn default_logger() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    builder
}

/// Colors only when writing to a terminal and `NO_COLOR` is unset.
fn use_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}
