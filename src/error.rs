use thiserror::Error;

/// Document-level failures. These abort the whole conversion.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("failed to decode configuration document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no valid outbounds")]
    NoOutbounds,

    /// Every outbound was skipped.
    #[error("no valid outbounds")]
    NoValidOutbounds,
}

/// Failures scoped to a single outbound. The pipeline logs and skips these.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("unsupported protocol: {0:?}")]
    UnsupportedProtocol(String),

    #[error("invalid {protocol} settings: {source}")]
    SettingsDecode {
        protocol: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid streamSettings: {0}")]
    StreamSettingsDecode(#[source] serde_json::Error),

    #[error("{protocol} outbound is missing required field `{field}`")]
    MissingField {
        protocol: &'static str,
        field: &'static str,
    },
}

impl ShareError {
    /// True for both "nothing configured" and "nothing convertible".
    pub fn is_no_valid_outbounds(&self) -> bool {
        matches!(self, ShareError::NoOutbounds | ShareError::NoValidOutbounds)
    }
}
