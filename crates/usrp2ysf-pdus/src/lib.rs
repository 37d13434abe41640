//! Wire formats of the gateway
//!
//! - `usrp`: fixed-layout USRP datagrams (voice, text info, end of transmission)
//! - `ysf`: YSF network datagrams, including FICH and payload channel coding

pub mod usrp;
pub mod ysf;
