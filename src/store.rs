use crate::models::{Company, PriceObservation};
use crate::{schema, Result};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;
use std::str::FromStr;

const INSERT_COMPANY_SQL: &str = "\
    INSERT INTO company (stock_symbol, company_name, venue) \
    VALUES (?1, ?2, ?3)";

// existence check and insert in one statement, so no writer can slip in between
const INSERT_PRICE_SQL: &str = "\
    INSERT INTO stock_prices ( \
    stock_symbol, last_traded_price, last_trade_datetime, venue \
    ) SELECT ?1, ?2, ?3, ?4 WHERE NOT EXISTS ( \
        SELECT 1 FROM stock_prices \
        WHERE stock_symbol = ?1 AND last_trade_datetime = ?3)";

const SELECT_PRICES_SQL: &str = "\
    SELECT stock_symbol, last_traded_price, last_trade_datetime, venue \
    FROM stock_prices WHERE stock_symbol = ?1 \
    ORDER BY last_trade_datetime";

/// Stock database holding one connection for its whole lifetime.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        Ok(Store { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Store { conn })
    }

    /// create tables if absent, safe to call on every start
    pub fn bootstrap(&self) -> Result<()> {
        schema::bootstrap(&self.conn)?;
        Ok(())
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        Ok(schema::table_names(&self.conn)?)
    }

    /// insert a company row, repeated calls for one symbol produce repeated rows
    pub fn insert_company(&self, company: &Company) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_COMPANY_SQL)?;
        stmt.execute(params![company.symbol, company.name, company.venue])?;
        Ok(())
    }

    /// insert a price row unless one exists for the same symbol and trade time
    ///
    /// Returns whether a row was written.
    pub fn insert_price(&self, price: &PriceObservation) -> Result<bool> {
        let mut stmt = self.conn.prepare_cached(INSERT_PRICE_SQL)?;
        let inserted = stmt.execute(params![
            price.symbol,
            price.price.to_string(),
            price.observed_at_text(),
            price.venue,
        ])?;
        if inserted == 0 {
            debug!(
                "price of {} at {} exists, skipped",
                price.symbol,
                price.observed_at_text()
            );
        }
        Ok(inserted > 0)
    }

    pub fn count_companies(&self, symbol: Option<&str>) -> Result<u64> {
        self.count(schema::TABLE_COMPANY, symbol)
    }

    pub fn count_prices(&self, symbol: Option<&str>) -> Result<u64> {
        self.count(schema::TABLE_STOCK_PRICES, symbol)
    }

    fn count(&self, table: &str, symbol: Option<&str>) -> Result<u64> {
        let n: i64 = match symbol {
            Some(symbol) => self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE stock_symbol = ?1", table),
                params![symbol],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table),
                [],
                |row| row.get(0),
            )?,
        };
        Ok(n as u64)
    }

    /// stored observations of one symbol, oldest first
    pub fn select_prices(&self, symbol: &str) -> Result<Vec<PriceObservation>> {
        let mut stmt = self.conn.prepare_cached(SELECT_PRICES_SQL)?;
        let price_iter = stmt.query_map(params![symbol], price_from_row)?;
        let mut prices = Vec::new();
        for price in price_iter {
            prices.push(price?);
        }
        Ok(prices)
    }

    /// latest stored trade time of one symbol
    pub fn last_observed_at(&self, symbol: &str) -> Result<Option<String>> {
        let last: Option<String> = self.conn.query_row(
            "SELECT MAX(last_trade_datetime) FROM stock_prices WHERE stock_symbol = ?1",
            params![symbol],
            |row| row.get(0),
        )?;
        Ok(last)
    }
}

fn price_from_row(row: &Row<'_>) -> rusqlite::Result<PriceObservation> {
    let price: String = row.get(1)?;
    let price = BigDecimal::from_str(&price)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let observed_at: String = row.get(2)?;
    let observed_at = DateTime::parse_from_rfc3339(&observed_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    Ok(PriceObservation {
        symbol: row.get(0)?,
        price,
        observed_at,
        venue: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn observation(symbol: &str, price: &str, secs: u32) -> PriceObservation {
        PriceObservation {
            symbol: symbol.to_owned(),
            price: BigDecimal::from_str(price).unwrap(),
            observed_at: Utc.with_ymd_and_hms(2016, 10, 7, 16, 0, secs).unwrap(),
            venue: "NASDAQ".to_owned(),
        }
    }

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.bootstrap().unwrap();
        store
    }

    #[test]
    fn test_insert_price_once() {
        let store = store();
        let p = observation("AAPL", "114.06", 2);
        assert!(store.insert_price(&p).unwrap());
        assert!(!store.insert_price(&p).unwrap());
        assert_eq!(1, store.count_prices(Some("AAPL")).unwrap());
    }

    #[test]
    fn test_dedup_ignores_price_and_venue() {
        let store = store();
        let p = observation("AAPL", "114.06", 2);
        store.insert_price(&p).unwrap();
        let mut q = observation("AAPL", "115.00", 2);
        q.venue = "NYSE".to_owned();
        assert!(!store.insert_price(&q).unwrap());
        assert_eq!(vec![p], store.select_prices("AAPL").unwrap());
    }

    #[test]
    fn test_insert_price_non_interference() {
        let store = store();
        assert!(store.insert_price(&observation("AAPL", "114.06", 2)).unwrap());
        assert!(store.insert_price(&observation("MSFT", "57.80", 2)).unwrap());
        assert!(store.insert_price(&observation("AAPL", "114.10", 3)).unwrap());
        assert_eq!(2, store.count_prices(Some("AAPL")).unwrap());
        assert_eq!(1, store.count_prices(Some("MSFT")).unwrap());
        assert_eq!(3, store.count_prices(None).unwrap());
    }

    #[test]
    fn test_company_inserted_unconditionally() {
        let store = store();
        let mut apple = Company {
            symbol: "AAPL".to_owned(),
            name: "Apple Inc.".to_owned(),
            venue: "NASDAQ".to_owned(),
        };
        store.insert_company(&apple).unwrap();
        apple.name = "Apple Computer".to_owned();
        store.insert_company(&apple).unwrap();
        assert_eq!(2, store.count_companies(Some("AAPL")).unwrap());
    }

    #[test]
    fn test_select_prices_ordered() {
        let store = store();
        store.insert_price(&observation("AAPL", "114.10", 3)).unwrap();
        store.insert_price(&observation("AAPL", "114.06", 2)).unwrap();
        let prices = store.select_prices("AAPL").unwrap();
        assert_eq!("114.06", prices[0].price.to_string());
        assert_eq!("114.10", prices[1].price.to_string());
        assert_eq!(
            Some("2016-10-07T16:00:03Z".to_owned()),
            store.last_observed_at("AAPL").unwrap()
        );
        assert_eq!(None, store.last_observed_at("MSFT").unwrap());
    }

    #[test]
    fn test_insert_before_bootstrap_fails() {
        let store = Store::open_in_memory().unwrap();
        let err = store.insert_price(&observation("AAPL", "114.06", 2)).unwrap_err();
        assert!(err.is_persistence());
    }
}
