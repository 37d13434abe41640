pub mod consts;
pub mod convolution;
pub mod dch;
pub mod fich;
pub mod frame;
pub mod golay;
pub mod interleave;
pub mod payload;

pub use consts::{DataType, FrameIndicator, VchBlocks};
pub use dch::DchMultiplexer;
pub use fich::Fich;
pub use frame::{YsfDataFrame, YsfPdu};
