use crate::error::Error;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use reqwest::blocking::{Client, RequestBuilder, Response};
use scraper::{Html, Selector};
use serde_derive::*;
use std::str::FromStr;

/// upstream a command is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Quote,
    Company,
}

/// RequestCommand
///
/// define how to build the request
pub trait RequestCommand {
    fn host(&self) -> Host;
    // build request against the base url of its host
    fn request(&self, http: &Client, base_url: &str) -> RequestBuilder;
}

/// QuoteCommand
///
/// defines how to handle response body
pub trait QuoteCommand: RequestCommand {
    type Output;
    // response is consumed, and the parsed output is returned
    fn response_body(&self, response: Response) -> Result<Self::Output, Error>;
}

/// latest trade of one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub ticker: String,
    pub price: BigDecimal,
    pub observed_at: DateTime<Utc>,
    pub venue: String,
}

/// company display name and the venue it trades on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub name: String,
    pub venue: String,
}

/// quote object as returned by the feed, keys are abbreviated upstream
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RawQuote {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "t", default)]
    pub ticker: Option<String>,
    #[serde(rename = "e", default)]
    pub exchange: Option<String>,
    #[serde(rename = "l", default)]
    pub last_trade_price: Option<String>,
    #[serde(rename = "l_cur", default)]
    pub last_trade_with_currency: Option<String>,
    #[serde(rename = "ltt", default)]
    pub last_trade_time: Option<String>,
    #[serde(rename = "lt_dts", default)]
    pub last_trade_datetime: Option<String>,
    #[serde(rename = "lt", default)]
    pub last_trade_datetime_long: Option<String>,
}

impl RawQuote {
    pub fn into_quote(self) -> Result<Quote, Error> {
        let ticker = non_empty(self.ticker).ok_or(Error::MissingField("t"))?;
        let venue = non_empty(self.exchange).ok_or(Error::MissingField("e"))?;
        let price = non_empty(self.last_trade_price).ok_or(Error::MissingField("l"))?;
        let observed_at =
            non_empty(self.last_trade_datetime).ok_or(Error::MissingField("lt_dts"))?;
        Ok(Quote {
            ticker,
            price: parse_price(&price)?,
            observed_at: parse_trade_datetime(&observed_at)?,
            venue,
        })
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// parse a price like `114.06` or `1,024.50`
pub fn parse_price(s: &str) -> Result<BigDecimal, Error> {
    let digits: String = s.trim().chars().filter(|c| *c != ',').collect();
    BigDecimal::from_str(&digits).map_err(|_| Error::Parse(format!("invalid price: {}", s)))
}

/// parse an ISO-8601 trade timestamp like `2016-10-07T16:00:02Z`
pub fn parse_trade_datetime(s: &str) -> Result<DateTime<Utc>, Error> {
    let dt = DateTime::parse_from_rfc3339(s.trim())
        .map_err(|e| Error::Parse(format!("invalid trade datetime {}: {}", s, e)))?;
    Ok(dt.with_timezone(&Utc))
}

/// parse the body of the quote feed
///
/// The feed guards its JSON array with a leading `//`.
pub fn parse_quotes(body: &str) -> Result<Vec<RawQuote>, Error> {
    let body = body.trim_start();
    let body = body.strip_prefix("//").unwrap_or(body);
    let quotes: Vec<RawQuote> = serde_json::from_str(body)?;
    Ok(quotes)
}

lazy_static! {
    static ref NAME_SELECTOR: Selector =
        Selector::parse("div.appbar-snippet-primary").expect("valid name selector");
    static ref VENUE_SELECTOR: Selector =
        Selector::parse("div.appbar-snippet-secondary").expect("valid venue selector");
}

/// scrape company name and venue from a company page
pub fn parse_company_page(html: &str) -> Result<Company, Error> {
    let document = Html::parse_document(html);
    let name = first_text(&document, &NAME_SELECTOR)
        .ok_or(Error::MissingField("appbar-snippet-primary"))?;
    let snippet = first_text(&document, &VENUE_SELECTOR)
        .ok_or(Error::MissingField("appbar-snippet-secondary"))?;
    let venue = venue_from_snippet(&snippet)
        .ok_or_else(|| Error::Parse(format!("no venue in snippet: {}", snippet)))?;
    Ok(Company { name, venue })
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .filter(|s| !s.is_empty())
}

// snippet reads like "(NASDAQ:AAPL)"
fn venue_from_snippet(snippet: &str) -> Option<String> {
    let head = snippet.split(':').next()?;
    let venue = head.trim().trim_start_matches('(').trim();
    if venue.is_empty() {
        return None;
    }
    Some(venue.to_owned())
}

/// all requests are defined below

/// latest quote of one symbol
#[derive(Debug, Clone)]
pub struct GetQuote {
    pub code: String,
}

impl RequestCommand for GetQuote {
    fn host(&self) -> Host {
        Host::Quote
    }

    fn request(&self, http: &Client, base_url: &str) -> RequestBuilder {
        http.get(format!("{}/finance/info", base_url))
            .query(&[("client", "ig"), ("q", self.code.as_str())])
    }
}

impl QuoteCommand for GetQuote {
    type Output = Quote;
    fn response_body(&self, response: Response) -> Result<Quote, Error> {
        let body = response.text()?;
        let raw = parse_quotes(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Parse(format!("no quote returned for {}", self.code)))?;
        raw.into_quote()
    }
}

/// company name and venue of one symbol
#[derive(Debug, Clone)]
pub struct GetCompany {
    pub code: String,
}

impl RequestCommand for GetCompany {
    fn host(&self) -> Host {
        Host::Company
    }

    fn request(&self, http: &Client, base_url: &str) -> RequestBuilder {
        http.get(format!("{}/finance", base_url))
            .query(&[("q", self.code.as_str())])
    }
}

impl QuoteCommand for GetCompany {
    type Output = Company;
    fn response_body(&self, response: Response) -> Result<Company, Error> {
        let html = response.text()?;
        parse_company_page(&html)
    }
}
