mod fingerprint;
mod store;
mod types;

pub use fingerprint::Fingerprint;
pub use store::{CacheStore, ResultCache};
pub use types::{CacheEntry, CacheStats};
