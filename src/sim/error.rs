//! Errors raised by trajectory operations.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimError {
    #[error("simulation has no anchor at or before the requested time; call init first")]
    Uninitialized,

    #[error("jump time {time} is not a whole frame")]
    NonIntegerTime { time: f64 },

    #[error("jump at frame {time} does not come after the last anchor at frame {last}")]
    NonMonotonicJump { time: f64, last: f64 },

    #[error("cannot project to time {time} from an anchor at time {anchor}")]
    InvalidTime { time: f64, anchor: f64 },
}
