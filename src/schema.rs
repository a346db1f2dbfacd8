//! Tables of the stock database.
//!
//! `company` is the dimension table, one row per symbol and run.
//! `stock_prices` is the fact table, one row per (symbol, trade time).
//! Prices are kept as decimal text and trade times as RFC 3339 UTC text.

use rusqlite::Connection;

pub const TABLE_COMPANY: &str = "company";
pub const TABLE_STOCK_PRICES: &str = "stock_prices";

const CREATE_TABLES: &str = "\
CREATE TABLE IF NOT EXISTS company (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_symbol TEXT NOT NULL,
    company_name TEXT NOT NULL,
    venue TEXT NOT NULL,
    inserted_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS stock_prices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    stock_symbol TEXT NOT NULL,
    last_traded_price TEXT NOT NULL,
    last_trade_datetime TEXT NOT NULL,
    venue TEXT NOT NULL,
    inserted_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS stock_prices_symbol_datetime
    ON stock_prices (stock_symbol, last_trade_datetime);
";

/// create both tables unless they exist
pub fn bootstrap(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TABLES)
}

/// names of the user tables present, sorted
pub fn table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
        WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
        ORDER BY name",
    )?;
    let names = stmt.query_map([], |row| row.get(0))?;
    names.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_twice() -> rusqlite::Result<()> {
        let conn = Connection::open_in_memory()?;
        bootstrap(&conn)?;
        let first = table_names(&conn)?;
        assert_eq!(vec![TABLE_COMPANY.to_owned(), TABLE_STOCK_PRICES.to_owned()], first);
        bootstrap(&conn)?;
        assert_eq!(first, table_names(&conn)?);
        Ok(())
    }
}
