pub mod frame;

pub use frame::UsrpFrame;
