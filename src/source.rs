use crate::models::{Company, PriceObservation, Symbol};
use crate::{Error, Result};
use quotedata::{GetCompany, GetQuote, QuoteClient};

/// where company metadata comes from
pub trait CompanySource {
    fn company(&self, symbol: &Symbol) -> Result<Company>;
}

/// where latest trades come from
pub trait QuoteSource {
    fn quote(&self, symbol: &Symbol) -> Result<PriceObservation>;
}

impl CompanySource for QuoteClient {
    fn company(&self, symbol: &Symbol) -> Result<Company> {
        let code = symbol.to_string();
        let company = self
            .execute(GetCompany { code: code.clone() })
            .map_err(|e| Error::lookup(&code, e))?;
        Ok(Company::new(symbol, company))
    }
}

// one request per symbol, the single result carries price, time and venue
impl QuoteSource for QuoteClient {
    fn quote(&self, symbol: &Symbol) -> Result<PriceObservation> {
        let code = symbol.to_string();
        let quote = self
            .execute(GetQuote { code: code.clone() })
            .map_err(|e| Error::lookup(&code, e))?;
        Ok(PriceObservation::new(symbol, quote))
    }
}

impl<T: CompanySource + ?Sized> CompanySource for &T {
    fn company(&self, symbol: &Symbol) -> Result<Company> {
        (**self).company(symbol)
    }
}

impl<T: QuoteSource + ?Sized> QuoteSource for &T {
    fn quote(&self, symbol: &Symbol) -> Result<PriceObservation> {
        (**self).quote(symbol)
    }
}
