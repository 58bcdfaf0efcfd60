use thiserror::Error;

/// Errors raised by scene construction and addressing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Identifier lookup miss. Recoverable; `find` returns `None` instead.
    #[error("no element named '{0}' in this subtree")]
    NotFound(String),

    /// Two siblings share a name. Fatal to tree construction, since later
    /// lookups would be ambiguous.
    #[error("duplicate identifier '{0}'")]
    DuplicateIdentifier(String),

    /// Promotion attempted on the root or on a node whose primitive is
    /// missing from its parent view. Unreachable when the state invariant
    /// holds, but checked.
    #[error("node cannot be promoted: no parent view holds its primitive")]
    InvalidPromotionTarget,
}
