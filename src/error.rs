//! Error taxonomy shared by every API operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The service answered, but with a status other than the one the
    /// operation expects. Carries the raw body text, even when empty.
    #[error("api request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Returns the body text when `response` carries the expected status,
/// otherwise an [`Error::Api`] with the actual status and body.
pub(crate) fn check_status(
    response: reqwest::blocking::Response,
    expected: reqwest::StatusCode,
) -> Result<String> {
    let status = response.status();
    let body = response.text()?;
    if status != expected {
        return Err(Error::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
