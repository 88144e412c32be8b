use thiserror::Error;

/// Failures while retrieving or decoding the earthquake feed.
///
/// None of these are fatal: the `DataFetcher` logs them and hands callers an
/// empty record list.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),

    #[error("feed responded with HTTP {0}")]
    Status(u16),

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}
