pub mod transports;
pub mod usrp_network;
pub mod ysf_network;

pub use usrp_network::UsrpNetwork;
pub use ysf_network::YsfNetwork;
