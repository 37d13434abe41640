//! Core utilities for the USRP/YSF gateway
//!
//! This crate provides fundamental types and utilities used across the gateway:
//! - BitBuffer for bit-level coding of YSF channel blocks
//! - CRC-16/CCITT as used on the YSF air interface
//! - Callsign sanitization and padding
//! - A deadline Timer driven by caller-supplied instants
//! - Logging setup and hex dumps

pub mod bitbuffer;
pub mod callsign;
pub mod crc;
pub mod debug;
pub mod pdu_parse_error;
pub mod timer;

pub use bitbuffer::BitBuffer;
pub use pdu_parse_error::PduParseErr;
pub use timer::Timer;

/// Version reported by `--version` and the startup banner
pub const GATEWAY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// PCM samples per USRP voice frame (20 ms at 8 kHz)
pub const PCM_SAMPLES_PER_FRAME: usize = 160;

/// Raw audio carried by one USRP voice frame
pub type PcmFrame = [i16; PCM_SAMPLES_PER_FRAME];

pub const SILENCE: PcmFrame = [0; PCM_SAMPLES_PER_FRAME];
