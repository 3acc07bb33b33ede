#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cancellation reason 01 for {uuid} requires a substitution UUID")]
    MissingSubstitution { uuid: String },
}
