use thiserror::Error;

/// Reasons a duration token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error(
        "invalid duration format `{0}`, expected a whole number followed by `s` or `m` \
         (e.g. 30s, 2m)"
    )]
    InvalidFormat(String),
    #[error("duration of {millis}ms is outside the allowed range of 15s to 10m")]
    OutOfRange { millis: u64 },
}

/// Everything the poll core can refuse. None of these are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error("the vote topic must not be empty")]
    EmptyTopic,
    #[error("there is already an active vote in this channel")]
    AlreadyActive,
    #[error("this vote has already ended or expired")]
    Expired,
    #[error("failed to publish the vote: {0}")]
    Presentation(String),
}
