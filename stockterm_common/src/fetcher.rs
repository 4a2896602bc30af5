//! Quote fetching from the chart API.
//!
//! `YahooClient` performs one request per ticker. `QuoteFetcher` fans a batch of
//! tickers out to a fixed pool of worker threads and collects the outcomes:
//!
//! - Jobs and results travel over `crossbeam_channel` channels; the calling thread
//!   multiplexes results, the operator interrupt and the batch deadline with `select!`.
//! - A shared stop flag keeps workers from starting new requests once the batch is
//!   over, so an interrupt or an expired deadline abandons the remaining tickers
//!   instead of retrying them.
//! - Outcomes are reordered to input order before they are returned.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, at, select, unbounded};
use log::{debug, info, warn};
use reqwest::Url;
use reqwest::blocking::Client;

use crate::batch::BatchReport;
use crate::config::Config;
use crate::error::StockError;
use crate::interrupt::Interrupt;
use crate::quote::{ChartResponse, QuoteSnapshot};
use crate::range::TimeRange;
use crate::result::Result;
use crate::tickers::Ticker;

/// Path segments of the chart endpoint below the service base URL.
const CHART_PATH: [&str; 3] = ["v8", "finance", "chart"];
/// The chart API rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) stockterm";

/// Point in time after which no request may still be running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Deadline(Instant::now() + timeout)
    }

    /// Deadline at `instant`.
    pub fn at(instant: Instant) -> Self {
        Deadline(instant)
    }

    /// Underlying instant.
    pub fn instant(&self) -> Instant {
        self.0
    }

    /// Time left, or `None` once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.0
            .checked_duration_since(Instant::now())
            .filter(|left| !left.is_zero())
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }
}

/// Source of single-ticker quotes.
pub trait QuoteSource: Send + Sync {
    /// Fetches one snapshot, giving up when `deadline` passes.
    fn fetch_one(
        &self,
        ticker: &Ticker,
        range: TimeRange,
        deadline: Deadline,
    ) -> Result<QuoteSnapshot>;
}

/// Blocking client for the Yahoo Finance chart API.
pub struct YahooClient {
    client: Client,
    base_url: Url,
    default_currency: String,
}

impl YahooClient {
    /// Client for the service and currency in `config`.
    ///
    /// Fails with `InvalidArgument` when the base URL cannot carry a path.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| invalid_base_url(&config.base_url, &e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid_base_url(&config.base_url, "not a base URL"));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StockError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            default_currency: config.default_currency.clone(),
        })
    }

    /// Chart URL for `ticker`, without query parameters.
    ///
    /// The symbol is one percent-encoded path segment, so `?`, `#` or `/` in a
    /// symbol cannot change which resource is requested.
    pub fn chart_url(&self, ticker: &Ticker) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| invalid_base_url(self.base_url.as_str(), "not a base URL"))?
            .pop_if_empty()
            .extend(CHART_PATH)
            .push(ticker.as_str());
        Ok(url)
    }
}

fn invalid_base_url(base_url: &str, reason: &str) -> StockError {
    StockError::InvalidArgument(format!("invalid base URL '{}': {}", base_url, reason))
}

impl QuoteSource for YahooClient {
    fn fetch_one(
        &self,
        ticker: &Ticker,
        range: TimeRange,
        deadline: Deadline,
    ) -> Result<QuoteSnapshot> {
        let timeout = deadline.remaining().ok_or(StockError::Timeout)?;
        let interval = range.interval();
        let range = range.to_string();
        let response = self
            .client
            .get(self.chart_url(ticker)?)
            .query(&[
                ("region", "US"),
                ("lang", "en-US"),
                ("includePrePost", "false"),
                ("interval", interval),
                ("useYfid", "true"),
                ("range", range.as_str()),
            ])
            .timeout(timeout)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            debug!("Chart request for {} returned {}", ticker, status);
            return Err(StockError::BadStatus(status.as_u16()));
        }

        let chart: ChartResponse = response.json()?;
        if let Some(error) = &chart.chart.error {
            debug!("Chart API error for {}: {} {}", ticker, error.code, error.description);
        }
        let snapshot = QuoteSnapshot::from_chart(&chart, &self.default_currency)
            .ok_or_else(|| StockError::NoData(ticker.clone()))?;
        if snapshot.ticker != *ticker {
            return Err(StockError::UnexpectedSymbol {
                requested: ticker.clone(),
                received: snapshot.ticker,
            });
        }
        Ok(snapshot)
    }
}

/// Why a batch stopped before every ticker was fetched.
#[derive(Debug, Clone, Copy)]
enum Abandon {
    Deadline,
    Interrupted,
}

impl Abandon {
    fn error(self) -> StockError {
        match self {
            Abandon::Deadline => StockError::Timeout,
            Abandon::Interrupted => StockError::Cancelled,
        }
    }
}

/// Batch quote fetcher with a fixed worker pool.
pub struct QuoteFetcher {
    source: Arc<dyn QuoteSource>,
    workers: usize,
}

impl QuoteFetcher {
    /// Fetcher over `source` using up to `workers` concurrent requests.
    pub fn new(source: Arc<dyn QuoteSource>, workers: usize) -> Self {
        Self {
            source,
            workers: workers.max(1),
        }
    }

    /// Fetcher talking to the configured chart service.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Arc::new(YahooClient::new(config)?), config.workers))
    }

    /// Fetches every ticker, continuing past individual failures.
    ///
    /// The report lists every input ticker in input order. Tickers still pending
    /// when `deadline` passes are reported as `Timeout`, and those pending when
    /// `interrupt` fires as `Cancelled`; neither is retried.
    pub fn fetch_many(
        &self,
        tickers: &[Ticker],
        range: TimeRange,
        deadline: Deadline,
        interrupt: &Interrupt,
    ) -> BatchReport<QuoteSnapshot> {
        let mut report = BatchReport::new();
        if tickers.is_empty() {
            return report;
        }

        let (job_tx, job_rx) = unbounded::<(usize, Ticker)>();
        for job in tickers.iter().cloned().enumerate() {
            // The receiver is alive in this scope, so the send cannot fail.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let (result_tx, result_rx) = unbounded::<(usize, Result<QuoteSnapshot>)>();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_count = self.workers.min(tickers.len());
        for id in 0..worker_count {
            let source = Arc::clone(&self.source);
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || run_worker(id, source, jobs, results, stop, range, deadline));
        }
        drop(result_tx);
        info!(
            "Fetching {} tickers ({}) with {} workers",
            tickers.len(),
            range,
            worker_count
        );

        let mut outcomes: Vec<Option<Result<QuoteSnapshot>>> =
            tickers.iter().map(|_| None).collect();
        let mut pending = tickers.len();
        let mut abandon = Abandon::Deadline;
        let timer = at(deadline.instant());

        while pending > 0 {
            select! {
                recv(result_rx) -> msg => match msg {
                    Ok((index, outcome)) => {
                        if let Err(e) = &outcome {
                            warn!("Error fetching data for {}: {}", tickers[index], e);
                        }
                        outcomes[index] = Some(outcome);
                        pending -= 1;
                    }
                    Err(_) => break,
                },
                recv(interrupt.receiver()) -> _ => {
                    warn!("Fetch interrupted with {} tickers pending", pending);
                    abandon = Abandon::Interrupted;
                    break;
                },
                recv(timer) -> _ => {
                    warn!("Fetch deadline passed with {} tickers pending", pending);
                    break;
                },
            }
        }
        stop.store(true, Ordering::SeqCst);

        for (ticker, outcome) in tickers.iter().zip(outcomes) {
            report.push(
                ticker.as_str(),
                outcome.unwrap_or_else(|| Err(abandon.error())),
            );
        }
        report
    }
}

fn run_worker(
    id: usize,
    source: Arc<dyn QuoteSource>,
    jobs: Receiver<(usize, Ticker)>,
    results: Sender<(usize, Result<QuoteSnapshot>)>,
    stop: Arc<AtomicBool>,
    range: TimeRange,
    deadline: Deadline,
) {
    while let Ok((index, ticker)) = jobs.recv() {
        if stop.load(Ordering::SeqCst) || deadline.is_expired() {
            break;
        }
        debug!("Worker {} fetching {}", id, ticker);
        let outcome = source.fetch_one(&ticker, range, deadline);
        if results.send((index, outcome)).is_err() {
            break;
        }
    }
    debug!("Worker {} stopping", id);
}
