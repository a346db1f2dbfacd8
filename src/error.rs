use std::fmt;

#[derive(Debug)]
pub enum Error {
    // remote source unreachable, malformed response or expected fields absent
    Lookup {
        symbol: String,
        source: quotedata::Error,
    },
    // storage unreachable or statement rejected
    Persistence(rusqlite::Error),
    Config(String),
}

impl Error {
    pub fn lookup(symbol: &str, source: quotedata::Error) -> Self {
        Error::Lookup {
            symbol: symbol.to_owned(),
            source,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::Lookup { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence(..))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lookup { symbol, source } => write!(f, "lookup of {} failed: {}", symbol, source),
            Error::Persistence(err) => write!(f, "persistence failed: {}", err),
            Error::Config(s) => write!(f, "invalid config: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lookup { source, .. } => Some(source),
            Error::Persistence(err) => Some(err),
            Error::Config(..) => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Error {
        Error::Persistence(err)
    }
}
