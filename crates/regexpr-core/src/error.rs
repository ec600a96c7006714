/// Failure raised while executing a production rule.
///
/// The parser attaches the token id and span of the occurrence being folded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// An `error` action fired.
    #[error("{0}")]
    Message(String),

    /// The rule precondition returned false.
    #[error("precondition not met")]
    PreCondition,

    /// The operand stack held fewer values than the rule pops.
    #[error("missing operand")]
    MissingOperand,

    /// An operand does not have the type the rule declares.
    #[error("operand {index} has an unexpected type")]
    OperandType { index: usize },

    /// A right delimiter produced nothing.
    #[error("delimiter produced no value")]
    NoProduction,
}
