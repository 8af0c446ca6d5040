use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebDriverClientError>;

#[derive(Debug, Error)]
pub enum WebDriverClientError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Script error: {0}")]
    Script(String),
}

impl From<thirtyfour::error::WebDriverError> for WebDriverClientError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        WebDriverClientError::Session(err.to_string())
    }
}
