use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use usrp2ysf_core::callsign;

/// USRP side: a single software radio endpoint
#[derive(Debug, Clone)]
pub struct CfgUsrp {
    /// Where USRP frames are sent, and the only source accepted
    pub remote: SocketAddr,
    pub local_port: u16,
    /// Gain in dB applied to audio going towards the USRP endpoint
    pub gain_adj_db: f32,
}

impl Default for CfgUsrp {
    fn default() -> Self {
        Self {
            remote: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 32001),
            local_port: 34001,
            gain_adj_db: 0.0,
        }
    }
}

/// Values transmitted in every outbound FICH
#[derive(Debug, Clone)]
pub struct CfgFich {
    /// 2 bits, CS
    pub callsign: u8,
    /// 2 bits, CM
    pub call_mode: u8,
    /// 3 bits, FT
    pub frame_total: u8,
    /// 3 bits, MR
    pub message_route: u8,
    pub voip: bool,
    /// 2 bits, DT. 2 is VD mode 2, the only mode translated.
    pub data_type: u8,
    pub sql_type: bool,
    /// 7 bits
    pub sql_code: u8,
}

impl Default for CfgFich {
    fn default() -> Self {
        Self {
            callsign: 2,
            call_mode: 0,
            frame_total: 7,
            message_route: 0,
            voip: false,
            data_type: 2,
            sql_type: false,
            sql_code: 0,
        }
    }
}

/// YSF side: a reflector or YSF gateway
#[derive(Debug, Clone)]
pub struct CfgYsf {
    pub remote: SocketAddr,
    pub local: SocketAddr,
    /// Gain in dB applied to audio before it is encoded for YSF
    pub gain_adj_db: f32,
    /// Up to 5 characters, sent in the CSD1 and DCH radio id slots
    pub radio_id: String,
    /// Data tags for DCH slots 6 and 7, up to 10 bytes each
    pub dt1: Vec<u8>,
    pub dt2: Vec<u8>,
    pub fich: CfgFich,
}

impl Default for CfgYsf {
    fn default() -> Self {
        Self {
            remote: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 42000),
            local: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 42013),
            gain_adj_db: 0.0,
            radio_id: "*****".to_string(),
            dt1: Vec::new(),
            dt2: Vec::new(),
            fich: CfgFich::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway callsign, sent in the YSF gateway field and in polls
    pub callsign: String,
    /// Hex-dump every datagram at DEBUG level
    pub debug: bool,
    pub debug_log: Option<String>,

    pub usrp: CfgUsrp,
    pub ysf: CfgYsf,
}

impl GatewayConfig {
    pub fn new(callsign: &str) -> Self {
        GatewayConfig {
            callsign: callsign.to_string(),
            debug: false,
            debug_log: None,
            usrp: CfgUsrp::default(),
            ysf: CfgYsf::default(),
        }
    }

    /// Validate that all configuration fields are within their wire ranges.
    pub fn validate(&self) -> Result<(), &str> {
        if self.callsign.is_empty() {
            return Err("callsign must not be empty");
        }
        if self.callsign.len() > callsign::YSF_CALLSIGN_LENGTH {
            return Err("callsign must be at most 10 characters");
        }
        if !self.callsign.is_ascii() {
            return Err("callsign must be ASCII");
        }

        if self.ysf.radio_id.len() > 5 || !self.ysf.radio_id.is_ascii() {
            return Err("ysf.radio_id must be at most 5 ASCII characters");
        }
        if self.ysf.dt1.len() > 10 {
            return Err("ysf.dt1 must be at most 10 bytes");
        }
        if self.ysf.dt2.len() > 10 {
            return Err("ysf.dt2 must be at most 10 bytes");
        }

        let fich = &self.ysf.fich;
        if fich.callsign > 3 {
            return Err("ysf.fich.callsign must fit in 2 bits");
        }
        if fich.call_mode > 3 {
            return Err("ysf.fich.call_mode must fit in 2 bits");
        }
        if fich.frame_total > 7 {
            return Err("ysf.fich.frame_total must fit in 3 bits");
        }
        if fich.message_route > 7 {
            return Err("ysf.fich.message_route must fit in 3 bits");
        }
        if fich.data_type > 3 {
            return Err("ysf.fich.data_type must fit in 2 bits");
        }
        if fich.sql_code > 127 {
            return Err("ysf.fich.sql_code must fit in 7 bits");
        }

        if self.usrp.remote.port() == 0 || self.ysf.remote.port() == 0 {
            return Err("destination ports must be non-zero");
        }

        Ok(())
    }

    /// Radio id right-padded to its 5-byte wire width
    pub fn radio_id_field(&self) -> [u8; 5] {
        let mut out = [b' '; 5];
        for (dst, src) in out.iter_mut().zip(self.ysf.radio_id.bytes()) {
            *dst = src;
        }
        out
    }
}

/// Read-only configuration, shared between gateway components.
#[derive(Clone)]
pub struct SharedConfig {
    cfg: Arc<GatewayConfig>,
}

impl SharedConfig {
    /// Panics on an invalid configuration. Loaders validate before constructing.
    pub fn from_config(cfg: GatewayConfig) -> Self {
        match cfg.validate() {
            Ok(_) => {}
            Err(e) => panic!("Invalid gateway configuration: {}", e),
        }

        Self { cfg: Arc::new(cfg) }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<GatewayConfig> {
        Arc::clone(&self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = GatewayConfig::new("G4KLX");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.ysf.fich.frame_total, 7);
        assert_eq!(&cfg.radio_id_field(), b"*****");
    }

    #[test]
    fn test_field_ranges() {
        let mut cfg = GatewayConfig::new("G4KLX");
        cfg.ysf.fich.frame_total = 8;
        assert!(cfg.validate().is_err());

        let mut cfg = GatewayConfig::new("G4KLX");
        cfg.ysf.fich.sql_code = 128;
        assert!(cfg.validate().is_err());

        let mut cfg = GatewayConfig::new("G4KLX");
        cfg.ysf.dt1 = vec![0; 11];
        assert!(cfg.validate().is_err());

        let mut cfg = GatewayConfig::new("G4KLX");
        cfg.ysf.radio_id = "ABCDEF".to_string();
        assert!(cfg.validate().is_err());

        assert!(GatewayConfig::new("").validate().is_err());
    }

    #[test]
    fn test_short_radio_id_is_padded() {
        let mut cfg = GatewayConfig::new("G4KLX");
        cfg.ysf.radio_id = "AB".to_string();
        assert_eq!(&cfg.radio_id_field(), b"AB   ");
    }

    #[test]
    #[should_panic(expected = "Invalid gateway configuration")]
    fn test_shared_config_rejects_invalid() {
        SharedConfig::from_config(GatewayConfig::new(""));
    }
}
