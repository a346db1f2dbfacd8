#![forbid(unsafe_code)]

mod error;
pub mod models;
pub mod poller;
pub mod schema;
pub mod source;
pub mod store;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use models::{Company, PriceObservation, Symbol};
pub use poller::{Iterations, PollConfig, PollState, PollSummary, Poller};
pub use source::{CompanySource, QuoteSource};
pub use store::Store;
