use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use super::gateway_config::{CfgFich, CfgUsrp, CfgYsf, GatewayConfig, SharedConfig};

/// Build `SharedConfig` from a TOML configuration file
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref usrp) = root.usrp {
        if !usrp.extra.is_empty() {
            return Err(format!("Unrecognized fields in usrp: {:?}", sorted_keys(&usrp.extra)).into());
        }
    }
    if let Some(ref ysf) = root.ysf {
        if !ysf.extra.is_empty() {
            return Err(format!("Unrecognized fields in ysf: {:?}", sorted_keys(&ysf.extra)).into());
        }
        if let Some(ref fich) = ysf.fich {
            if !fich.extra.is_empty() {
                return Err(format!("Unrecognized fields in ysf.fich: {:?}", sorted_keys(&fich.extra)).into());
            }
        }
    }

    let mut cfg = GatewayConfig::new(&root.callsign);
    cfg.debug = root.debug.unwrap_or(false);
    cfg.debug_log = root.debug_log;

    if let Some(usrp) = root.usrp {
        apply_usrp_patch(&mut cfg.usrp, usrp)?;
    }
    if let Some(ysf) = root.ysf {
        apply_ysf_patch(&mut cfg.ysf, ysf)?;
    }

    cfg.validate().map_err(|e| format!("Invalid configuration: {}", e))?;

    Ok(SharedConfig::from_config(cfg))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let cfg = from_reader(r)?;
    Ok(cfg)
}

/// Resolve `host:port`, taking the first address returned.
fn resolve(host: &str, port: u16, field: &str) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| format!("Unable to resolve {} {}: {}", field, host, e))?
        .next()
        .ok_or_else(|| format!("No address found for {} {}", field, host).into())
}

fn apply_usrp_patch(dst: &mut CfgUsrp, src: UsrpDto) -> Result<(), Box<dyn std::error::Error>> {
    let host = src.address.unwrap_or_else(|| dst.remote.ip().to_string());
    let port = src.dst_port.unwrap_or(dst.remote.port());
    dst.remote = resolve(&host, port, "usrp.address")?;

    if let Some(v) = src.local_port {
        dst.local_port = v;
    }
    if let Some(v) = src.gain_adj_db {
        dst.gain_adj_db = v;
    }
    Ok(())
}

fn apply_ysf_patch(dst: &mut CfgYsf, src: YsfDto) -> Result<(), Box<dyn std::error::Error>> {
    let host = src.dst_address.unwrap_or_else(|| dst.remote.ip().to_string());
    let port = src.dst_port.unwrap_or(dst.remote.port());
    dst.remote = resolve(&host, port, "ysf.dst_address")?;

    let host = src.local_address.unwrap_or_else(|| dst.local.ip().to_string());
    let port = src.local_port.unwrap_or(dst.local.port());
    dst.local = resolve(&host, port, "ysf.local_address")?;

    if let Some(v) = src.gain_adj_db {
        dst.gain_adj_db = v;
    }
    if let Some(v) = src.radio_id {
        dst.radio_id = v;
    }
    if let Some(v) = src.dt1 {
        dst.dt1 = v;
    }
    if let Some(v) = src.dt2 {
        dst.dt2 = v;
    }
    if let Some(fich) = src.fich {
        apply_fich_patch(&mut dst.fich, fich);
    }
    Ok(())
}

fn apply_fich_patch(dst: &mut CfgFich, src: FichDto) {
    if let Some(v) = src.callsign {
        dst.callsign = v;
    }
    if let Some(v) = src.call_mode {
        dst.call_mode = v;
    }
    if let Some(v) = src.frame_total {
        dst.frame_total = v;
    }
    if let Some(v) = src.message_route {
        dst.message_route = v;
    }
    if let Some(v) = src.voip {
        dst.voip = v;
    }
    if let Some(v) = src.data_type {
        dst.data_type = v;
    }
    if let Some(v) = src.sql_type {
        dst.sql_type = v;
    }
    if let Some(v) = src.sql_code {
        dst.sql_code = v;
    }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    callsign: String,
    debug: Option<bool>,
    debug_log: Option<String>,

    #[serde(default)]
    usrp: Option<UsrpDto>,

    #[serde(default)]
    ysf: Option<YsfDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct UsrpDto {
    address: Option<String>,
    dst_port: Option<u16>,
    local_port: Option<u16>,
    gain_adj_db: Option<f32>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct YsfDto {
    dst_address: Option<String>,
    dst_port: Option<u16>,
    local_address: Option<String>,
    local_port: Option<u16>,
    gain_adj_db: Option<f32>,
    radio_id: Option<String>,
    dt1: Option<Vec<u8>>,
    dt2: Option<Vec<u8>>,

    #[serde(default)]
    fich: Option<FichDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct FichDto {
    callsign: Option<u8>,
    call_mode: Option<u8>,
    frame_total: Option<u8>,
    message_route: Option<u8>,
    voip: Option<bool>,
    data_type: Option<u8>,
    sql_type: Option<bool>,
    sql_code: Option<u8>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}
