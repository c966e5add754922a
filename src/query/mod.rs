pub mod executor;
pub mod source;

pub use executor::QueryExecutor;
pub use source::{QuerySource, StdinPoll, StreamProbe};
