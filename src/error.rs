use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Google authentication error: {0}")]
    Auth(#[from] gcp_auth::Error),

    /// Slack answered with `ok: false`.
    #[error("Slack API error: {0}")]
    Slack(String),

    #[error("Spreadsheet error: {0}")]
    Sheets(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
