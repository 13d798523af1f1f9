// Cache module for local filesystem caching.
// Stores fetched repository lists to avoid redundant API calls.

pub mod paths;
pub mod store;

pub use store::{CachedData, DEFAULT_TTL, read_cached, read_if_valid, write_cached};
