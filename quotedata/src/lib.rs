//! Blocking client of a public stock quote feed and its company pages.
//!
//! Every request is a typed command executed by [`QuoteClient`]:
//! [`GetQuote`] returns the latest trade of a symbol, [`GetCompany`]
//! scrapes the company name and trading venue.

pub mod cli;
pub mod error;
pub mod model;

pub use cli::{QuoteClient, DEFAULT_COMPANY_URL, DEFAULT_QUOTE_URL};
pub use error::Error;
pub use model::{Company, GetCompany, GetQuote, Quote, QuoteCommand, RequestCommand};
