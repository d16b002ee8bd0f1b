/// Errors raised while decoding inbound payloads.
///
/// Classification itself never fails; these only surface at the adapter edge.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}
