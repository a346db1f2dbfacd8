use crate::{Error, Result};
use bigdecimal::BigDecimal;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

/// Ticker of a company, optionally qualified by its exchange,
/// e.g. `NASDAQ:AAPL` or `AAPL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    exchange: Option<String>,
    ticker: String,
}

impl Symbol {
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn exchange(&self) -> Option<&str> {
        self.exchange.as_deref()
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.contains(char::is_whitespace) {
            return Err(Error::Config(format!("invalid symbol: {:?}", s)));
        }
        let mut parts = s.split(':');
        let (exchange, ticker) = match (parts.next(), parts.next(), parts.next()) {
            (Some(ticker), None, _) => (None, ticker),
            (Some(exchange), Some(ticker), None) if !exchange.is_empty() => {
                (Some(exchange.to_owned()), ticker)
            }
            _ => return Err(Error::Config(format!("invalid symbol: {:?}", s))),
        };
        if ticker.is_empty() {
            return Err(Error::Config(format!("invalid symbol: {:?}", s)));
        }
        Ok(Symbol {
            exchange,
            ticker: ticker.to_owned(),
        })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exchange {
            Some(ref exchange) => write!(f, "{}:{}", exchange, self.ticker),
            None => f.write_str(&self.ticker),
        }
    }
}

/// row of table company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub symbol: String,
    pub name: String,
    pub venue: String,
}

impl Company {
    pub fn new(symbol: &Symbol, company: quotedata::Company) -> Self {
        Company {
            symbol: symbol.to_string(),
            name: company.name,
            venue: company.venue,
        }
    }
}

/// row of table stock_prices
///
/// `(symbol, observed_at)` identifies an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub symbol: String,
    pub price: BigDecimal,
    pub observed_at: DateTime<Utc>,
    pub venue: String,
}

impl PriceObservation {
    pub fn new(symbol: &Symbol, quote: quotedata::Quote) -> Self {
        PriceObservation {
            symbol: symbol.to_string(),
            price: quote.price,
            observed_at: quote.observed_at,
            venue: quote.venue,
        }
    }

    /// stored spelling of the observation time
    pub fn observed_at_text(&self) -> String {
        format_observed_at(&self.observed_at)
    }
}

/// one instant always maps to the same text, which makes the text usable as dedup key
pub fn format_observed_at(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
