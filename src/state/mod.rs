// State management module.
// Holds the persisted tracking state: usernames and per-repo history.

pub mod history;

pub use history::{History, HistoryStore};
