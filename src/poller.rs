//! Polling loop
//!
//! The poller bootstraps the schema, records company metadata once per
//! symbol, then fetches and stores the latest trade of every symbol once
//! per iteration, sleeping between iterations.
//!
//! Any lookup or persistence failure ends the run at once: symbols after
//! the failing one are not processed in that iteration.

use crate::models::Symbol;
use crate::source::{CompanySource, QuoteSource};
use crate::store::Store;
use crate::{Error, Result};
use chrono::Utc;
use log::{error, info};
use std::time::Duration;

/// largest companies by market cap, polled when no symbols are configured
pub const DEFAULT_SYMBOLS: &[&str] = &[
    "NASDAQ:AAPL",
    "NASDAQ:GOOGL",
    "NASDAQ:MSFT",
    "NASDAQ:AMZN",
    "NASDAQ:FB",
    "NYSE:XOM",
    "NYSE:BRK.A",
    "NYSE:JNJ",
    "NYSE:BABA",
    "NYSE:GE",
    "NYSE:CHL",
];

/// one hour between quote updates
pub const DEFAULT_DELAY: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterations {
    Bounded(u64),
    // loops until a failure or until the process is killed
    Unbounded,
}

impl Iterations {
    fn is_last(&self, iteration: u64) -> bool {
        match *self {
            Iterations::Bounded(n) => iteration >= n,
            Iterations::Unbounded => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub symbols: Vec<Symbol>,
    pub iterations: Iterations,
    pub delay: Duration,
}

impl PollConfig {
    pub fn new(symbols: Vec<Symbol>, iterations: Iterations, delay: Duration) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::Config("no symbols to poll".to_owned()));
        }
        if iterations == Iterations::Bounded(0) {
            return Err(Error::Config("iteration count must be positive".to_owned()));
        }
        Ok(PollConfig {
            symbols,
            iterations,
            delay,
        })
    }

    /// parse a comma separated symbol list like `NASDAQ:AAPL,NYSE:GE`
    pub fn parse_symbols(list: &str) -> Result<Vec<Symbol>> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse())
            .collect()
    }

    pub fn default_symbols() -> Result<Vec<Symbol>> {
        DEFAULT_SYMBOLS.iter().map(|s| s.parse()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Init,
    Running { iteration: u64 },
    Done,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub iterations: u64,
    pub companies_inserted: u64,
    pub prices_inserted: u64,
    pub duplicates_skipped: u64,
}

pub struct Poller<'a, C, Q> {
    store: &'a Store,
    companies: C,
    quotes: Q,
    config: PollConfig,
    state: PollState,
    summary: PollSummary,
    sleeper: Box<dyn FnMut(Duration) + 'a>,
}

impl<'a, C, Q> Poller<'a, C, Q>
where
    C: CompanySource,
    Q: QuoteSource,
{
    pub fn new(store: &'a Store, companies: C, quotes: Q, config: PollConfig) -> Self {
        Poller {
            store,
            companies,
            quotes,
            config,
            state: PollState::Init,
            summary: PollSummary::default(),
            sleeper: Box::new(std::thread::sleep),
        }
    }

    /// replace the blocking sleep between iterations
    pub fn with_sleeper<F>(mut self, sleeper: F) -> Self
    where
        F: FnMut(Duration) + 'a,
    {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn summary(&self) -> &PollSummary {
        &self.summary
    }

    /// run to completion, returns only on failure when unbounded
    pub fn run(&mut self) -> Result<PollSummary> {
        match self.init().and_then(|_| self.poll()) {
            Ok(()) => {
                self.state = PollState::Done;
                info!(
                    "done after {} iterations: {} prices inserted, {} duplicates skipped",
                    self.summary.iterations,
                    self.summary.prices_inserted,
                    self.summary.duplicates_skipped
                );
                Ok(self.summary.clone())
            }
            Err(e) => {
                self.state = PollState::Failed;
                error!("polling failed: {}", e);
                Err(e)
            }
        }
    }

    fn init(&mut self) -> Result<()> {
        self.state = PollState::Init;
        self.store.bootstrap()?;
        for symbol in &self.config.symbols {
            info!("fetching company of {}", symbol);
            let company = self.companies.company(symbol)?;
            self.store.insert_company(&company)?;
            self.summary.companies_inserted += 1;
        }
        Ok(())
    }

    fn poll(&mut self) -> Result<()> {
        let mut iteration = 0;
        loop {
            iteration += 1;
            self.state = PollState::Running { iteration };
            self.poll_once(iteration)?;
            self.summary.iterations = iteration;
            if self.config.iterations.is_last(iteration) {
                return Ok(());
            }
            (self.sleeper)(self.config.delay);
        }
    }

    fn poll_once(&mut self, iteration: u64) -> Result<()> {
        info!(
            "{} loop: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            iteration
        );
        for symbol in &self.config.symbols {
            info!("processing {}", symbol);
            let price = self.quotes.quote(symbol)?;
            if self.store.insert_price(&price)? {
                self.summary.prices_inserted += 1;
            } else {
                self.summary.duplicates_skipped += 1;
            }
        }
        Ok(())
    }
}
