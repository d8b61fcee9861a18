use thiserror::Error;

use crate::session::MatchPhase;

/// Expected, locally recoverable session failures.
///
/// Every operation on the session either succeeds or returns one of these
/// and leaves state unchanged. None of them abort the process.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("no selections to confirm")]
    NoSelections,

    #[error("insufficient balance: stake total {stake} exceeds balance {balance}")]
    InsufficientBalance { stake: u64, balance: u64 },

    #[error("{operation} is not allowed in phase {phase:?}")]
    IllegalTransition {
        operation: &'static str,
        phase: MatchPhase,
    },
}

pub type Result<T> = std::result::Result<T, SessionError>;
