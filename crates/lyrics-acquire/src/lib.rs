pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod pacer;
pub mod pipeline;
pub mod retry;
pub mod strip;

pub use error::{AcquireError, FetchError};
pub use fetch::{HttpFetcher, PageSource};
pub use pipeline::collect;
