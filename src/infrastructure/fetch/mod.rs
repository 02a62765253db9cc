mod http_media_fetcher;

pub use http_media_fetcher::{DEFAULT_FALLBACK_EXTENSION, HttpMediaFetcher, staging_extension};
