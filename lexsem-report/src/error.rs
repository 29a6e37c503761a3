use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
