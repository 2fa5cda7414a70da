//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response could not be read.
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The API answered with success but the body is empty or is not a
    /// header-first array of rows.
    #[error("Undecodable payload: {0}")]
    UndecodablePayload(String),
    /// The base URL and endpoint do not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
