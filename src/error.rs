use thiserror::Error;

pub type DashResult<T> = Result<T, DashError>;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to parse attribute `{attribute}`: {reason}")]
    AttributeParse { attribute: String, reason: String },

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("no dataset has been loaded yet")]
    NotLoaded,

    #[error("row index {index} is out of range for {len} rows")]
    RowOutOfRange { index: usize, len: usize },

    #[error("event listener `{0}` is already registered")]
    DuplicateListener(String),
}

impl DashError {
    pub(crate) fn attribute(attribute: &str, reason: impl std::fmt::Display) -> Self {
        Self::AttributeParse {
            attribute: attribute.to_owned(),
            reason: reason.to_string(),
        }
    }
}
