use thiserror::Error;

use crate::node::NodeKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// Nothing is stored at the path.
    #[error("{path} not defined.")]
    Undefined { path: String },
    /// Nothing usable is stored at the path.
    #[error("{path} not defined or {reason}.")]
    Uninterpretable { path: String, reason: &'static str },
    /// `add` needed the value as a mapping key or set member.
    #[error("{path}: a {kind} cannot be used as a key or set member")]
    UnhashableValue { path: String, kind: NodeKind },
}

impl BlobError {
    /// The fully-qualified key path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            BlobError::Undefined { path }
            | BlobError::Uninterpretable { path, .. }
            | BlobError::UnhashableValue { path, .. } => path,
        }
    }
}
