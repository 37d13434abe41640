use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use usrp2ysf_config::SharedConfig;
use usrp2ysf_core::Timer;
use usrp2ysf_pdus::usrp::UsrpFrame;
use usrp2ysf_pdus::ysf::YsfPdu;

use super::usrp_to_ysf::UsrpToYsf;
use super::ysf_to_usrp::YsfToUsrp;
use crate::converter::Converter;
use crate::network::transports::{NetworkError, NetworkTransport};
use crate::network::{UsrpNetwork, YsfNetwork};

/// Interval between YSF frames sent to the reflector: one frame is five 20 ms voice blocks
pub const YSF_FRAME_PERIOD: Duration = Duration::from_millis(100);
/// Interval between USRP frames sent to the endpoint: one frame is 160 samples at 8 kHz
pub const USRP_FRAME_PERIOD: Duration = Duration::from_millis(20);
/// Keep-alive interval towards the reflector
pub const POLL_PERIOD: Duration = Duration::from_secs(5);
/// Silence from the reflector after which the link is reported stale
pub const WATCHDOG_PERIOD: Duration = Duration::from_millis(1500);
/// Iterations shorter than this sleep for the remainder
pub const MIN_LOOP_PERIOD: Duration = Duration::from_millis(5);

/// Bridges a USRP endpoint and a YSF reflector.
///
/// All work happens in [`Gateway::poll`], which is driven with explicit instants.
/// [`Gateway::run`] wraps it in a real-time loop until the running flag is cleared.
pub struct Gateway<U: NetworkTransport, Y: NetworkTransport, C: Converter> {
    usrp: UsrpNetwork<U>,
    ysf: YsfNetwork<Y>,
    converter: C,

    usrp_to_ysf: UsrpToYsf,
    ysf_to_usrp: YsfToUsrp,

    usrp_pacing: Timer,
    ysf_pacing: Timer,
    poll_timer: Timer,
    watchdog: Timer,
    link_stale: bool,
}

impl<U: NetworkTransport, Y: NetworkTransport, C: Converter> Gateway<U, Y, C> {
    pub fn new(config: SharedConfig, usrp: UsrpNetwork<U>, ysf: YsfNetwork<Y>, converter: C) -> Self {
        let cfg = config.config();
        Self {
            usrp,
            ysf,
            converter,
            usrp_to_ysf: UsrpToYsf::new(&cfg),
            ysf_to_usrp: YsfToUsrp::new(),
            usrp_pacing: Timer::new(USRP_FRAME_PERIOD),
            ysf_pacing: Timer::new(YSF_FRAME_PERIOD),
            poll_timer: Timer::new(POLL_PERIOD),
            watchdog: Timer::new(WATCHDOG_PERIOD),
            link_stale: false,
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn usrp_to_ysf(&self) -> &UsrpToYsf {
        &self.usrp_to_ysf
    }

    pub fn ysf_to_usrp(&self) -> &YsfToUsrp {
        &self.ysf_to_usrp
    }

    pub fn is_link_stale(&self) -> bool {
        self.link_stale
    }

    /// Open both network legs. Failure of either is fatal for the gateway.
    pub fn open(&mut self) -> Result<(), NetworkError> {
        self.usrp.open()?;
        self.ysf.open()?;
        Ok(())
    }

    /// Register with the reflector and arm all timers
    pub fn start(&mut self, now: Instant) {
        self.send_poll();
        self.usrp_pacing.start(now);
        self.ysf_pacing.start(now);
        self.poll_timer.start(now);
        self.watchdog.start(now);
    }

    /// One iteration of the gateway loop
    pub fn poll(&mut self, now: Instant) {
        self.rx_usrp(now);
        self.rx_ysf(now);

        if self.usrp_pacing.has_expired(now) {
            self.usrp_pacing.start(now);
            self.tx_usrp();
        }

        if self.ysf_pacing.has_expired(now) {
            self.ysf_pacing.start(now);
            self.tx_ysf();
        }

        if self.poll_timer.has_expired(now) {
            self.poll_timer.start(now);
            self.send_poll();
        }

        if self.watchdog.has_expired(now) && !self.link_stale {
            tracing::warn!("No data from the YSF network for {} ms, link is stale", WATCHDOG_PERIOD.as_millis());
            self.link_stale = true;
        }
    }

    /// Unlink from the reflector and close both legs
    pub fn shutdown(&mut self) {
        if let Err(e) = self.ysf.write_unlink() {
            tracing::warn!("Failed to send YSF unlink: {}", e);
        }
        self.usrp.close();
        self.ysf.close();
    }

    /// Run until `running` is cleared, then shut down
    pub fn run(&mut self, running: Arc<AtomicBool>) {
        self.start(Instant::now());
        tracing::info!("Gateway started");

        while running.load(Ordering::SeqCst) {
            let iteration_start = Instant::now();
            self.poll(iteration_start);

            let elapsed = iteration_start.elapsed();
            if elapsed < MIN_LOOP_PERIOD {
                std::thread::sleep(MIN_LOOP_PERIOD - elapsed);
            }
        }

        tracing::info!("Gateway stopping");
        self.shutdown();
    }

    fn rx_usrp(&mut self, now: Instant) {
        for data in self.usrp.read() {
            match UsrpFrame::from_bytes(&data) {
                Ok(frame) => self.usrp_to_ysf.handle_frame(frame, now, &mut self.converter),
                Err(e) => tracing::debug!("USRP datagram of {} bytes dropped: {}", data.len(), e),
            }
        }
    }

    fn rx_ysf(&mut self, now: Instant) {
        for data in self.ysf.read() {
            self.watchdog.start(now);
            if self.link_stale {
                tracing::info!("YSF network link restored");
                self.link_stale = false;
            }

            match YsfPdu::from_bytes(&data) {
                Ok(pdu) => self.ysf_to_usrp.handle_pdu(pdu, now, &mut self.converter),
                Err(e) => tracing::debug!("YSF datagram of {} bytes dropped: {}", data.len(), e),
            }
        }
    }

    fn tx_usrp(&mut self) {
        let Some(tagged) = self.converter.get_usrp() else {
            return;
        };
        let bytes = self.ysf_to_usrp.build_frame(tagged);
        if let Err(e) = self.usrp.write(&bytes) {
            tracing::warn!("Failed to send USRP frame: {}", e);
        }
    }

    fn tx_ysf(&mut self) {
        let Some(tagged) = self.converter.get_ysf() else {
            return;
        };
        let frame = self.usrp_to_ysf.build_frame(tagged);
        tracing::trace!("-> {}", frame);
        if let Err(e) = self.ysf.write(&frame.to_bytes()) {
            tracing::warn!("Failed to send YSF frame: {}", e);
        }
    }

    fn send_poll(&mut self) {
        if let Err(e) = self.ysf.write_poll() {
            tracing::warn!("Failed to send YSF poll: {}", e);
        }
    }
}
