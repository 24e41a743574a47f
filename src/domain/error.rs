//! Domain error types.

/// Top-level error type for cryptrader.
#[derive(Debug, thiserror::Error)]
pub enum CryptraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error for {symbol}: {reason}")]
    DataSource { symbol: String, reason: String },

    #[error("malformed candle data in {source_name}: {reason}")]
    MalformedData { source_name: String, reason: String },

    #[error("state persistence error at {path}: {reason}")]
    StatePersistence { path: String, reason: String },

    #[error("no candle data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient candle data for {symbol}: have {candles}, need {minimum}")]
    InsufficientData {
        symbol: String,
        candles: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CryptraderError> for std::process::ExitCode {
    fn from(err: &CryptraderError) -> Self {
        let code: u8 = match err {
            CryptraderError::Io(_) => 1,
            CryptraderError::ConfigParse { .. }
            | CryptraderError::ConfigMissing { .. }
            | CryptraderError::ConfigInvalid { .. } => 2,
            CryptraderError::DataSource { .. } | CryptraderError::MalformedData { .. } => 3,
            CryptraderError::StatePersistence { .. } => 4,
            CryptraderError::NoData { .. } | CryptraderError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
