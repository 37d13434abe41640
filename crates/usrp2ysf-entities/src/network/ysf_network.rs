use std::net::SocketAddr;

use usrp2ysf_core::callsign;
use usrp2ysf_core::debug::hex_dump;
use usrp2ysf_pdus::ysf::consts::YSF_CALLSIGN_LENGTH;
use usrp2ysf_pdus::ysf::frame::{poll_bytes, unlink_bytes};

use super::transports::{NetworkError, NetworkTransport, address_matches};

/// YSF leg: data frames, keep-alive polls and the final unlink towards a reflector
pub struct YsfNetwork<T: NetworkTransport> {
    transport: T,
    remote: SocketAddr,
    callsign: [u8; YSF_CALLSIGN_LENGTH],
    debug: bool,
}

impl<T: NetworkTransport> YsfNetwork<T> {
    pub fn new(transport: T, remote: SocketAddr, gateway_callsign: &str, debug: bool) -> Self {
        Self {
            transport,
            remote,
            callsign: callsign::to_ysf_field(gateway_callsign),
            debug,
        }
    }

    /// Gateway callsign, padded to the YSF field width
    pub fn callsign(&self) -> &[u8; YSF_CALLSIGN_LENGTH] {
        &self.callsign
    }

    pub fn open(&mut self) -> Result<(), NetworkError> {
        tracing::info!("Opening YSF network connection to {}", self.remote);
        self.transport.connect()
    }

    pub fn write(&mut self, data: &[u8]) -> Result<(), NetworkError> {
        if self.debug {
            tracing::debug!("{}", hex_dump("YSF Network Data Sent", data));
        }
        self.transport.send_unreliable(data)
    }

    pub fn write_poll(&mut self) -> Result<(), NetworkError> {
        let poll = poll_bytes(&self.callsign);
        self.write(&poll)
    }

    pub fn write_unlink(&mut self) -> Result<(), NetworkError> {
        let unlink = unlink_bytes(&self.callsign);
        self.write(&unlink)
    }

    /// Drain pending datagrams, dropping any that do not come from the reflector
    pub fn read(&mut self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for msg in self.transport.receive_unreliable() {
            if !address_matches(&msg.source, &self.remote) {
                tracing::info!("YSF packet received from an invalid source: {}", msg.source);
                continue;
            }
            if self.debug {
                tracing::debug!("{}", hex_dump("YSF Network Data Received", &msg.payload));
            }
            out.push(msg.payload);
        }
        out
    }

    pub fn close(&mut self) {
        self.transport.close();
        tracing::info!("Closing YSF network connection");
    }
}
