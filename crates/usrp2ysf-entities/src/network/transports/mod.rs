use std::net::SocketAddr;

pub mod udp;

/// Datagram transport abstraction for the two network legs of the gateway
///
/// Both legs are unreliable (UDP). Receiving never blocks: all pending
/// datagrams are drained and returned at once.
pub trait NetworkTransport: Send {
    /// Open (or reopen) the transport. Destroys any existing socket.
    fn connect(&mut self) -> Result<(), NetworkError>;

    /// Send a datagram to the configured remote endpoint
    fn send_unreliable(&mut self, payload: &[u8]) -> Result<(), NetworkError>;

    /// Receive pending datagrams (non-blocking)
    fn receive_unreliable(&mut self) -> Vec<NetworkMessage>;

    /// Release the socket. Sending afterwards fails until `connect` is called again.
    fn close(&mut self);
}

/// Datagram received from the network
#[derive(Debug, Clone)]
pub struct NetworkMessage {
    pub source: SocketAddr,
    pub payload: Vec<u8>,
}

/// Network-related errors
#[derive(Debug, Clone)]
pub enum NetworkError {
    ConnectionFailed(String),
    SendFailed(String),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            NetworkError::SendFailed(msg) => write!(f, "Send failed: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {}

/// True if both the IP and the port of `a` and `b` are equal
pub fn address_matches(a: &SocketAddr, b: &SocketAddr) -> bool {
    a.ip() == b.ip() && a.port() == b.port()
}
