use clap::Parser;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use usrp2ysf_config::{SharedConfig, toml_config};
use usrp2ysf_core::{GATEWAY_VERSION, debug};
use usrp2ysf_entities::network::transports::udp::UdpTransport;
use usrp2ysf_entities::{Gateway, ModeConverter, NullVocoder, UsrpNetwork, YsfNetwork};

const DEFAULT_CONFIG_PATH: &str = "/etc/usrp2ysf.toml";

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SharedConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "usrp2ysf",
    about = "USRP to YSF gateway",
    long_about = "Bridges voice calls between a USRP endpoint and a YSF reflector",
    disable_version_flag = true
)]
struct Args {
    /// Print version and exit
    #[arg(short = 'v', long = "version")]
    version: bool,

    #[arg(help = "TOML config with network and FICH parameters", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => {
            // --help
            let _ = e.print();
            std::process::exit(0);
        }
    }
}

fn main() {
    let args = parse_args();
    if args.version {
        println!("usrp2ysf version {}", GATEWAY_VERSION);
        return;
    }

    eprintln!("░█░█░█▀▀░█▀▄░█▀█░▀▀▄░█░█░█▀▀░█▀▀");
    eprintln!("░█░█░▀▀█░█▀▄░█▀▀░▄▀░░░█░░▀▀█░█▀▀");
    eprintln!("░▀▀▀░▀▀▀░▀░▀░▀░░░▀▀▀░░▀░░▀▀▀░▀░░\n");
    eprintln!(" -> version {}", GATEWAY_VERSION);

    let cfg = load_config_from_toml(&args.config);
    let config = cfg.config();
    let _log_guard = debug::setup_logging_default(config.debug_log.clone());

    let usrp_bind = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), config.usrp.local_port);
    let usrp = UsrpNetwork::new(UdpTransport::new(config.usrp.remote, usrp_bind), config.usrp.remote, config.debug);
    let ysf = YsfNetwork::new(
        UdpTransport::new(config.ysf.remote, config.ysf.local),
        config.ysf.remote,
        &config.callsign,
        config.debug,
    );
    let converter = ModeConverter::new(NullVocoder, config.usrp.gain_adj_db, config.ysf.gain_adj_db);

    let mut gateway = Gateway::new(cfg.clone(), usrp, ysf, converter);
    if let Err(e) = gateway.open() {
        tracing::error!("Cannot open network connections: {}", e);
        std::process::exit(1);
    }

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        tracing::error!("Failed to set Ctrl+C handler: {}", e);
        std::process::exit(1);
    }

    tracing::info!("usrp2ysf-{} starting, callsign {}", GATEWAY_VERSION, config.callsign);
    gateway.run(running);
    tracing::info!("usrp2ysf-{} exited", GATEWAY_VERSION);
}
