//! Translation engine: one call state machine per direction plus the paced output loop

pub mod engine;
pub mod usrp_to_ysf;
pub mod ysf_to_usrp;

pub use engine::Gateway;
pub use usrp_to_ysf::UsrpToYsf;
pub use ysf_to_usrp::YsfToUsrp;

use std::time::Instant;

/// Call state of one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    InCall {
        /// Voice frames received in this call
        frames: u32,
        started: Instant,
    },
}
