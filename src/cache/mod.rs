mod store;

pub use store::{CacheEntry, TranslationCache, cache_key};
