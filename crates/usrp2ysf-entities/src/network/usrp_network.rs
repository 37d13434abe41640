use std::net::SocketAddr;

use usrp2ysf_core::debug::hex_dump;

use super::transports::{NetworkError, NetworkTransport, address_matches};

/// USRP leg: exchanges raw datagrams with a single software radio endpoint
pub struct UsrpNetwork<T: NetworkTransport> {
    transport: T,
    remote: SocketAddr,
    debug: bool,
}

impl<T: NetworkTransport> UsrpNetwork<T> {
    pub fn new(transport: T, remote: SocketAddr, debug: bool) -> Self {
        Self { transport, remote, debug }
    }

    pub fn open(&mut self) -> Result<(), NetworkError> {
        tracing::info!("Opening USRP network connection to {}", self.remote);
        self.transport.connect()
    }

    pub fn write(&mut self, data: &[u8]) -> Result<(), NetworkError> {
        if self.debug {
            tracing::debug!("{}", hex_dump("USRP Network Data Sent", data));
        }
        self.transport.send_unreliable(data)
    }

    /// Drain pending datagrams, dropping any that do not come from the configured endpoint
    pub fn read(&mut self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for msg in self.transport.receive_unreliable() {
            if !address_matches(&msg.source, &self.remote) {
                tracing::info!("USRP packet received from an invalid source: {}", msg.source);
                continue;
            }
            if self.debug {
                tracing::debug!("{}", hex_dump("USRP Network Data Received", &msg.payload));
            }
            out.push(msg.payload);
        }
        out
    }

    pub fn close(&mut self) {
        self.transport.close();
        tracing::info!("Closing USRP network connection");
    }
}
