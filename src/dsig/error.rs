#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("credential error: {0}")]
    Credentials(#[from] crate::credentials::Error),

    #[error("XML processing error: {0}")]
    Xml(#[from] crate::xml::Error),
}
