use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use usrp2ysf_entities::network::transports::{NetworkError, NetworkMessage, NetworkTransport};

#[derive(Default)]
struct MockState {
    connected: bool,
    fail_connect: bool,
    inbound: VecDeque<NetworkMessage>,
    sent: Vec<Vec<u8>>,
}

/// In-memory datagram transport. The paired [`MockHandle`] injects inbound
/// datagrams and inspects what the gateway sent.
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> (Self, MockHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (Self { state: state.clone() }, MockHandle { state })
    }
}

impl MockHandle {
    pub fn inject(&self, source: SocketAddr, payload: Vec<u8>) {
        self.state.lock().unwrap().inbound.push_back(NetworkMessage {
            source,
            payload,
        });
    }

    pub fn take_sent(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.state.lock().unwrap().sent)
    }

    pub fn sent_count(&self) -> usize {
        self.state.lock().unwrap().sent.len()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    pub fn fail_connect(&self) {
        self.state.lock().unwrap().fail_connect = true;
    }
}

impl NetworkTransport for MockTransport {
    fn connect(&mut self) -> Result<(), NetworkError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_connect {
            return Err(NetworkError::ConnectionFailed("mock bind refused".to_string()));
        }
        state.connected = true;
        Ok(())
    }

    fn send_unreliable(&mut self, payload: &[u8]) -> Result<(), NetworkError> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            return Err(NetworkError::SendFailed("not connected".to_string()));
        }
        state.sent.push(payload.to_vec());
        Ok(())
    }

    fn receive_unreliable(&mut self) -> Vec<NetworkMessage> {
        self.state.lock().unwrap().inbound.drain(..).collect()
    }

    fn close(&mut self) {
        self.state.lock().unwrap().connected = false;
    }
}
