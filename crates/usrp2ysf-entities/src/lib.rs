//! Gateway entities: network legs, audio conversion and the translation engine

pub mod converter;
pub mod gateway;
pub mod network;

pub use converter::{Converter, ModeConverter, NullVocoder, TaggedFrame, Vocoder};
pub use gateway::Gateway;
pub use network::{UsrpNetwork, YsfNetwork};
