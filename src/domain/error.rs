//! Domain error types.

/// Top-level error type for smacross.
#[derive(Debug, thiserror::Error)]
pub enum SmacrossError {
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

    #[error("unknown pair {pair}")]
    UnknownPair { pair: String },

    #[error("data unavailable for {asset}: {reason}")]
    DataUnavailable { asset: String, reason: String },

    #[error("insufficient history for {asset}: have {bars} bars, need {requested}")]
    InsufficientHistory {
        asset: String,
        bars: usize,
        requested: usize,
    },

    #[error("metrics recording failed: {reason}")]
    Recording { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SmacrossError {
    /// Configuration failures are fatal before the first tick.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SmacrossError::ConfigParse { .. }
                | SmacrossError::ConfigMissing { .. }
                | SmacrossError::ConfigInvalid { .. }
                | SmacrossError::UnknownPair { .. }
        )
    }
}

impl From<&SmacrossError> for std::process::ExitCode {
    fn from(err: &SmacrossError) -> Self {
        let code: u8 = match err {
            SmacrossError::Io(_) | SmacrossError::Recording { .. } => 1,
            SmacrossError::ConfigParse { .. }
            | SmacrossError::ConfigMissing { .. }
            | SmacrossError::ConfigInvalid { .. }
            | SmacrossError::UnknownPair { .. } => 2,
            SmacrossError::DataUnavailable { .. } | SmacrossError::InsufficientHistory { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
