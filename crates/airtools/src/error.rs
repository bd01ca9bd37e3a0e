use airtools_core::request::CredentialsError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Invalid credentials: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
