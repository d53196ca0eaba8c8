//! Error types surfaced by the target engine.
//!
//! Everything here is a wiring or programming mistake; recoverable gaps
//! (missing reward, missing spawn blueprint) never reach this type.
use thiserror::Error;

use crate::entities::Action;
use crate::target::TargetId;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error("action {0:?} was invoked but no implementation is bound to it")]
    ActionNotImplemented(Action),

    #[error("value changer has no recognized reward or penalty strategy")]
    UnrecognizedStrategy,

    #[error("target {0} is not on the roster")]
    UnknownTarget(TargetId),
}
