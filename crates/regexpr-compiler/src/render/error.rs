/// Errors that abort rendering. No pattern is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A repeat directly wraps another repeat.
    #[error("nested repeat: a repeat cannot directly wrap another repeat")]
    NestedRepeat,

    /// An assertion appears inside another assertion.
    #[error("nested assertion: lookaround cannot be nested")]
    NestedAssert,

    /// A character-set expression has no resolvable class element.
    #[error("char set does not resolve to any class element")]
    CharClassEval,

    /// A generated group name violates `[A-Za-z][A-Za-z0-9_]{0,31}`.
    #[error("invalid capture id `{0}`")]
    InvalidCaptureId(String),

    #[error("duplicate capture id `{0}`")]
    DuplicateCaptureId(String),
}
