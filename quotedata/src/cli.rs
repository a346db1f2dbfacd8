use crate::error::Error;
use crate::model::{Host, QuoteCommand};
use log::debug;
use std::time::Duration;

/// quote feed serving `/finance/info`
pub const DEFAULT_QUOTE_URL: &str = "http://finance.google.com";
/// company pages serving `/finance?q=`
pub const DEFAULT_COMPANY_URL: &str = "https://www.google.com";

// company pages are only rendered in full for desktop browsers
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/51.0.2704.103 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client of the quote feed and the company pages.
///
/// One underlying http client is shared by every command, so connections
/// are kept alive across the symbols of a polling run.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: reqwest::blocking::Client,
    quote_url: String,
    company_url: String,
}

impl QuoteClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_urls(DEFAULT_QUOTE_URL, DEFAULT_COMPANY_URL)
    }

    pub fn with_urls(quote_url: &str, company_url: &str) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(QuoteClient {
            http,
            quote_url: quote_url.trim_end_matches('/').to_owned(),
            company_url: company_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn execute<C: QuoteCommand>(&self, command: C) -> Result<C::Output, Error> {
        let base_url = match command.host() {
            Host::Quote => &self.quote_url,
            Host::Company => &self.company_url,
        };
        let request = command.request(&self.http, base_url).build()?;
        debug!("{} {}", request.method(), request.url());
        let response = self.http.execute(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16(), response.url().to_string()));
        }
        let output = command.response_body(response)?;
        Ok(output)
    }
}
