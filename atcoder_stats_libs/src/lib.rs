pub mod cache;
pub mod client;
pub mod fetch;
pub mod model;

pub use cache::CachedApiClient;
pub use client::{AtCoderProblemsApi, KenkooooClient};
pub use fetch::{settle_until, FetchState, FetchStatus};
