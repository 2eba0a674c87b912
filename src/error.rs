use std::io;
use thiserror::Error;


pub type Result<T> = std::result::Result<T, Error>;


#[derive(Debug, Error)]
pub enum Error {
    #[error("variable '{0}' is already registered")]
    DuplicateVariable(String),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("0 is not a literal")]
    ZeroLiteral,

    #[error("literal {0} references no registered variable")]
    LiteralOutOfRange(i32),

    #[error("interaction strength must be at least 1, got {0}")]
    InvalidStrength(usize),

    #[error("solver budget exhausted before a result was reached")]
    BudgetExhausted,

    #[error("PARSE ERROR at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}
