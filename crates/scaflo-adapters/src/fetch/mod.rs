//! Fetcher adapters.

mod fixed;
mod http;

pub use fixed::StaticFetcher;
pub use http::HttpFetcher;
