use thiserror::Error;

/// Errors raised by the provider accessors and the action wire decoder.
///
/// Every variant is a wiring or contract defect in the caller, never a
/// transient condition; nothing here is worth retrying.
#[derive(Debug, Error)]
pub enum ContextError {
    /// An accessor was called outside any enclosing provider.
    #[error("Cannot find {context}")]
    MissingProvider { context: &'static str },

    /// A wire action carried a tag outside the known set.
    #[error("unhandled action: {tag}")]
    UnhandledAction { tag: String },

    #[error("malformed action: {0}")]
    MalformedAction(#[from] serde_json::Error),

    /// An observer was registered inside a scope that was already torn down.
    #[error("cannot observe {context}: its scope has been disposed")]
    ScopeDisposed { context: &'static str },

    #[error("unknown color '{0}' (expected red, orange or yellow)")]
    UnknownColor(String),
}

impl ContextError {
    pub(crate) fn missing(context: &'static str) -> Self {
        ContextError::MissingProvider { context }
    }
}
