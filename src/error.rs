use thiserror::Error;

/// Failures talking to the calendar backend.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("calendar request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed calendar payload: {0}")]
    Payload(String),

    #[error("calendar client is not authenticated")]
    Unauthenticated,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config line {line}: {content}")]
    Syntax { line: usize, content: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
