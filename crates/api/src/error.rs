use recurrence_editor_api_structs::codec::CodecError;
use recurrence_editor_domain::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("The occurrence service is unavailable. Error message: `{0}`")]
    ServiceUnavailable(String),
    #[error("The response belongs to an outdated version of the rule")]
    StaleResponse,
    #[error("The rule cannot be sent to the occurrence service: {0}")]
    InvalidRule(ValidationError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
