use thiserror::Error;

/// Fatal problems detected while building an adapter or one of its elements.
///
/// Callers decide whether to skip the element and continue; the core never
/// retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("element does not have the '{0}' attribute")]
    MissingMarker(&'static str),
    #[error("no audio source provided")]
    MissingAudioSource,
    #[error("no path data provided")]
    MissingPathDescriptor,
}

pub type Result<T> = std::result::Result<T, ConstructionError>;
