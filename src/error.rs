use thiserror::Error;

use crate::game::ActionId;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("Unknown action id: {0}")]
    UnknownAction(ActionId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type BalanceResult<T> = Result<T, BalanceError>;
