use std::fmt;

#[derive(Debug)]
pub enum Error {
    Reqwest(reqwest::Error),
    // status code and url of a non-2xx response
    Status(u16, String),
    Parse(String),
    MissingField(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Reqwest(ref err) => write!(f, "Reqwest error: {}", err),
            Error::Status(code, ref url) => write!(f, "Server error: status {} from {}", code, url),
            Error::Parse(ref s) => write!(f, "Parse error: {}", s),
            Error::MissingField(field) => write!(f, "Missing field: {}", field),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Reqwest(ref err) => Some(err),
            Error::Status(..) => None,
            Error::Parse(..) => None,
            Error::MissingField(..) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::Reqwest(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Parse(format!("{}", err))
    }
}
