use std::net::{SocketAddr, UdpSocket};

use super::{NetworkError, NetworkMessage, NetworkTransport};

/// Largest datagram either protocol produces, with headroom
const MAX_DATAGRAM_LEN: usize = 2000;

/// UDP-based network transport
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    remote_addr: SocketAddr,
    bind_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(remote_addr: SocketAddr, bind_addr: SocketAddr) -> Self {
        Self {
            socket: None,
            remote_addr,
            bind_addr,
        }
    }

    /// Address the socket is bound to, once connected
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }
}

impl NetworkTransport for UdpTransport {
    fn send_unreliable(&mut self, payload: &[u8]) -> Result<(), NetworkError> {
        let Some(ref socket) = self.socket else {
            return Err(NetworkError::SendFailed("No active socket".to_string()));
        };

        let sent = socket
            .send_to(payload, self.remote_addr)
            .map_err(|e| NetworkError::SendFailed(format!("UDP send to {} failed: {}", self.remote_addr, e)))?;
        if sent != payload.len() {
            return Err(NetworkError::SendFailed(format!("UDP short send: {} of {} bytes", sent, payload.len())));
        }
        Ok(())
    }

    fn receive_unreliable(&mut self) -> Vec<NetworkMessage> {
        let mut messages = Vec::new();

        if let Some(ref socket) = self.socket {
            let mut buffer = [0u8; MAX_DATAGRAM_LEN];
            loop {
                match socket.recv_from(&mut buffer) {
                    Ok((len, source)) => {
                        messages.push(NetworkMessage {
                            source,
                            payload: buffer[..len].to_vec(),
                        });
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        break; // No more data
                    }
                    Err(e) => {
                        tracing::debug!("UDP receive on {} failed: {}", self.bind_addr, e);
                        break;
                    }
                }
            }
        }

        messages
    }

    fn connect(&mut self) -> Result<(), NetworkError> {
        self.socket = None;
        let socket = UdpSocket::bind(self.bind_addr)
            .map_err(|e| NetworkError::ConnectionFailed(format!("UDP bind to {} failed: {}", self.bind_addr, e)))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| NetworkError::ConnectionFailed(format!("Failed to set non-blocking: {}", e)))?;

        tracing::debug!("UDP socket bound to {}, remote {}", self.bind_addr, self.remote_addr);
        self.socket = Some(socket);
        Ok(())
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::debug!("UDP socket on {} closed", self.bind_addr);
        }
    }
}
