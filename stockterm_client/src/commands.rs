//! Command dispatch for the `stockterm` binary.
//!
//! Each command maps to one handler. Handlers write user-facing output to the
//! supplied writer and return `Err` only for failures that should end the process
//! with a non-zero exit code; per-ticker failures inside `get`, `add` and `remove`
//! are printed as warnings instead.
use std::collections::HashSet;
use std::io::Write;

use crossbeam_channel::Receiver;
use stockterm_common::fetcher::{Deadline, QuoteFetcher};
use stockterm_common::store::FileStore;
use stockterm_common::tickers::split_list;
use stockterm_common::watchlist::WatchlistManager;
use stockterm_common::{Config, Interrupt, Result, StockError, Ticker};
use strum_macros::{Display, EnumString};

use crate::list_editor;
use crate::render::TableRenderer;

const EMPTY_WATCHLIST: &str = "Watchlist is empty. Add tickers with 'stockterm add <ticker>'";
const MISSING_TICKER: &str = "missing ticker argument";

/// Commands understood by the binary.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum CommandKind {
    Get,
    GetAll,
    List,
    Add,
    Remove,
    Help,
    Version,
}

impl CommandKind {
    /// Parses a command word; unknown words become `InvalidCommand`.
    pub fn parse(word: &str) -> Result<Self> {
        word.parse()
            .map_err(|_| StockError::InvalidCommand(word.to_string()))
    }
}

/// Everything a command needs, built once in `main`.
pub struct Context {
    /// Resolved configuration.
    pub config: Config,
    /// Watchlist backed by the configured store.
    pub manager: WatchlistManager<FileStore>,
    /// Batch quote fetcher.
    pub fetcher: QuoteFetcher,
    /// Operator interrupt raised by Ctrl+C.
    pub interrupt: Interrupt,
    /// Lines typed by the user, consumed by the list editor.
    pub input: Receiver<String>,
    /// Table renderer for quotes.
    pub renderer: TableRenderer,
}

/// Runs `command` with its optional ticker argument.
pub fn execute<W: Write>(
    ctx: &Context,
    command: &str,
    argument: Option<&str>,
    out: &mut W,
) -> Result<()> {
    match CommandKind::parse(command)? {
        CommandKind::Get => get_tickers_price(ctx, required(argument)?, out),
        CommandKind::GetAll => get_watchlist_price(ctx, out),
        CommandKind::List => edit_watchlist(ctx, out),
        CommandKind::Add => add_tickers(ctx, required(argument)?, out),
        CommandKind::Remove => remove_tickers(ctx, required(argument)?, out),
        CommandKind::Help => {
            writeln!(out, "{}", usage_text())?;
            Ok(())
        }
        CommandKind::Version => {
            writeln!(out, "{}", version_text())?;
            Ok(())
        }
    }
}

fn required(argument: Option<&str>) -> Result<&str> {
    argument
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| StockError::InvalidArgument(MISSING_TICKER.to_string()))
}

/// Splits a comma list into raw pieces, failing when nothing usable is left.
fn ticker_pieces(argument: &str) -> Result<Vec<String>> {
    let pieces = split_list(argument);
    if pieces.is_empty() {
        return Err(StockError::InvalidArgument(MISSING_TICKER.to_string()));
    }
    Ok(pieces)
}

fn get_tickers_price<W: Write>(ctx: &Context, argument: &str, out: &mut W) -> Result<()> {
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();
    for raw in ticker_pieces(argument)? {
        match Ticker::parse(&raw) {
            Ok(ticker) if seen.insert(ticker.clone()) => tickers.push(ticker),
            Ok(_) => {}
            Err(e) => writeln!(out, "Warning: {}", e)?,
        }
    }
    fetch_and_render(ctx, &tickers, out)
}

fn get_watchlist_price<W: Write>(ctx: &Context, out: &mut W) -> Result<()> {
    let tickers = ctx.manager.list()?;
    if tickers.is_empty() {
        writeln!(out, "{}", EMPTY_WATCHLIST)?;
        return Ok(());
    }
    fetch_and_render(ctx, &tickers, out)
}

fn fetch_and_render<W: Write>(ctx: &Context, tickers: &[Ticker], out: &mut W) -> Result<()> {
    let deadline = Deadline::after(ctx.config.request_timeout);
    let report = ctx
        .fetcher
        .fetch_many(tickers, ctx.config.default_range, deadline, &ctx.interrupt);

    let mut cancelled = false;
    for (ticker, e) in report.failures() {
        cancelled |= matches!(e, StockError::Cancelled);
        writeln!(out, "Warning: error fetching data for {}: {}", ticker, e)?;
    }

    let snapshots = report.into_successes();
    if snapshots.is_empty() {
        writeln!(out, "No quote data available.")?;
    } else {
        ctx.renderer.render(out, &snapshots)?;
    }

    if cancelled {
        return Err(StockError::Cancelled);
    }
    Ok(())
}

fn edit_watchlist<W: Write>(ctx: &Context, out: &mut W) -> Result<()> {
    let tickers = ctx.manager.list()?;
    if tickers.is_empty() {
        writeln!(out, "{}", EMPTY_WATCHLIST)?;
        return Ok(());
    }

    let outcome = list_editor::run_interactive(tickers, &ctx.input, &ctx.interrupt, out)?;
    if !outcome.saved {
        writeln!(out, "Watchlist not updated")?;
        return Ok(());
    }

    ctx.manager.replace(&outcome.tickers)?;
    writeln!(out, "Watchlist has been updated!")?;
    Ok(())
}

fn add_tickers<W: Write>(ctx: &Context, argument: &str, out: &mut W) -> Result<()> {
    let report = ctx.manager.add_many(&ticker_pieces(argument)?);
    for item in report.items() {
        match &item.outcome {
            Ok(ticker) => writeln!(out, "{} has been added to the watchlist", ticker)?,
            Err(e) => writeln!(out, "Warning: {}", e)?,
        }
    }
    Ok(())
}

fn remove_tickers<W: Write>(ctx: &Context, argument: &str, out: &mut W) -> Result<()> {
    let report = ctx.manager.remove_many(&ticker_pieces(argument)?);
    for item in report.items() {
        match &item.outcome {
            Ok(ticker) => writeln!(out, "{} has been removed from the watchlist", ticker)?,
            Err(e) => writeln!(out, "Warning: {}", e)?,
        }
    }
    Ok(())
}

/// Help text printed by `help` and on usage errors.
pub fn usage_text() -> &'static str {
    r#"StockTerm - A terminal-based stock viewer

Usage:
  stockterm <command> [arguments] [options]

Commands:
  get <ticker>       Display stock price in a table. Multiple tickers can be separated by commas.
  get-all            Display watchlist in a table.
  list               Display an editable list of all tickers in the watchlist.
  add <ticker>       Add ticker to watchlist. Multiple tickers can be separated by commas.
  remove <ticker>    Remove ticker from watchlist. Multiple tickers can be separated by commas.
  help               Display this help message.
  version            Display version information.

Options:
  --range <RANGE>    Chart range: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max.
  --timeout <SECS>   Seconds allowed for fetching all quotes.
  --workers <N>      Number of quotes fetched concurrently.
  --home <DIR>       Directory holding the watchlist (default ~/.stockterm).
  --base-url <URL>   Quote service base URL.

Examples:
  stockterm get MSFT
  stockterm get AAPL,GOOGL,MSFT
  stockterm add TSLA
  stockterm add AAPL,META,TSLA
  stockterm remove TSLA
  stockterm get-all
  stockterm list"#
}

/// Text printed by `version`.
pub fn version_text() -> String {
    format!(
        "StockTerm v{}\nA terminal-based stock viewer",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;

    use crossbeam_channel::{never, unbounded};
    use rust_decimal::Decimal;
    use stockterm_common::fetcher::QuoteSource;
    use stockterm_common::quote::QuoteSnapshot;
    use stockterm_common::range::TimeRange;
    use tempfile::TempDir;

    /// Quotes every symbol at 101 against a previous close of 100, except `BAD`.
    struct FixedSource;

    impl QuoteSource for FixedSource {
        fn fetch_one(
            &self,
            ticker: &Ticker,
            _range: TimeRange,
            _deadline: Deadline,
        ) -> Result<QuoteSnapshot> {
            if ticker.as_str() == "BAD" {
                return Err(StockError::BadStatus(404));
            }
            Ok(QuoteSnapshot {
                ticker: ticker.clone(),
                last_price: Decimal::from(101),
                change: Decimal::from(1),
                change_percent: Some(Decimal::from(1)),
                previous_close: Decimal::from(100),
                currency: "USD".into(),
                exchange: None,
                market_time: None,
            })
        }
    }

    fn context(dir: &TempDir, input: Receiver<String>) -> Context {
        let config = Config::new(dir.path()).with_timeout(Duration::from_secs(5));
        Context {
            manager: WatchlistManager::new(FileStore::from_config(&config)),
            fetcher: QuoteFetcher::new(Arc::new(FixedSource), 2),
            config,
            interrupt: Interrupt::new(),
            input,
            renderer: TableRenderer::new(false),
        }
    }

    fn run(ctx: &Context, command: &str, argument: Option<&str>) -> Result<String> {
        let mut out = Vec::new();
        execute(ctx, command, argument, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn test_command_words() {
        assert_eq!(CommandKind::parse("get-all").ok(), Some(CommandKind::GetAll));
        assert_eq!(CommandKind::parse("version").ok(), Some(CommandKind::Version));
        assert!(matches!(
            CommandKind::parse("fetch"),
            Err(StockError::InvalidCommand(word)) if word == "fetch"
        ));
        assert!(CommandKind::parse("GET").is_err());
    }

    #[test]
    fn test_missing_argument_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());
        for command in ["get", "add", "remove"] {
            assert!(matches!(
                run(&ctx, command, None),
                Err(StockError::InvalidArgument(_))
            ));
        }
        assert!(matches!(
            run(&ctx, "add", Some(" , ")),
            Err(StockError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn test_add_reports_each_ticker() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());

        let output = run(&ctx, "add", Some("tsla,aapl,TSLA"))?;
        assert!(output.contains("TSLA has been added to the watchlist"));
        assert!(output.contains("AAPL has been added to the watchlist"));
        assert!(output.contains("Warning: ticker TSLA is already in the watchlist"));
        assert_eq!(fs::read_to_string(&ctx.config.watchlist_path)?, "AAPL,TSLA");
        Ok(())
    }

    #[test]
    fn test_remove_reports_each_ticker() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());
        run(&ctx, "add", Some("AAPL,MSFT"))?;

        let output = run(&ctx, "remove", Some("zzz,msft"))?;
        assert!(output.contains("Warning: ticker ZZZ is not in the watchlist"));
        assert!(output.contains("MSFT has been removed from the watchlist"));
        assert_eq!(fs::read_to_string(&ctx.config.watchlist_path)?, "AAPL");
        Ok(())
    }

    #[test]
    fn test_get_renders_successes_and_warns_failures() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());

        let output = run(&ctx, "get", Some("aapl,bad,msft"))?;
        assert!(output.contains("Warning: error fetching data for BAD"));
        let aapl = output.find("| AAPL").expect("AAPL row");
        let msft = output.find("| MSFT").expect("MSFT row");
        assert!(aapl < msft);
        assert!(output.contains("+1.00%"));
        Ok(())
    }

    #[test]
    fn test_get_warns_on_malformed_symbol() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());

        let output = run(&ctx, "get", Some("brk b,aapl"))?;
        assert!(output.contains("Warning: invalid ticker symbol 'BRK B'"));
        assert!(output.contains("| AAPL"));
        Ok(())
    }

    #[test]
    fn test_get_all_on_empty_watchlist() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());
        assert!(run(&ctx, "get-all", None)?.contains(EMPTY_WATCHLIST));
        assert!(run(&ctx, "list", None)?.contains(EMPTY_WATCHLIST));
        Ok(())
    }

    #[test]
    fn test_get_all_uses_watchlist_order() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());
        run(&ctx, "add", Some("tsla,aapl"))?;

        let output = run(&ctx, "get-all", None)?;
        let aapl = output.find("| AAPL").expect("AAPL row");
        let tsla = output.find("| TSLA").expect("TSLA row");
        assert!(aapl < tsla);
        Ok(())
    }

    #[test]
    fn test_list_saves_edited_watchlist() -> Result<()> {
        let dir = TempDir::new()?;
        let (tx, rx) = unbounded();
        let ctx = context(&dir, rx);
        run(&ctx, "add", Some("AAPL,MSFT,TSLA"))?;
        for line in ["j", "", "s"] {
            tx.send(line.to_string()).expect("send");
        }

        let output = run(&ctx, "list", None)?;
        assert!(output.contains("Watchlist has been updated!"));
        assert_eq!(fs::read_to_string(&ctx.config.watchlist_path)?, "AAPL,TSLA");
        Ok(())
    }

    #[test]
    fn test_list_quit_keeps_watchlist() -> Result<()> {
        let dir = TempDir::new()?;
        let (tx, rx) = unbounded();
        let ctx = context(&dir, rx);
        run(&ctx, "add", Some("AAPL,MSFT"))?;
        for line in ["", "q"] {
            tx.send(line.to_string()).expect("send");
        }

        let output = run(&ctx, "list", None)?;
        assert!(output.contains("Watchlist not updated"));
        assert_eq!(fs::read_to_string(&ctx.config.watchlist_path)?, "AAPL,MSFT");
        Ok(())
    }

    #[test]
    fn test_help_and_version() -> Result<()> {
        let dir = TempDir::new()?;
        let ctx = context(&dir, never());
        assert!(run(&ctx, "help", None)?.contains("get-all"));
        assert!(run(&ctx, "version", None)?.starts_with("StockTerm v"));
        Ok(())
    }
}
