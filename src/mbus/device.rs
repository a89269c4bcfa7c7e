//! # Device Capability Interface
//!
//! Device drivers sit above the master: they know which records live at
//! which offsets in a particular meter's telegrams and turn exchanges into
//! typed readings. This module defines the small capability surface the
//! engine expects from them ([`MBusDevice::refresh`]) and [`Monitor`], a
//! scheduled task that calls `refresh` periodically.

use crate::error::MBusError;
use crate::logging::log_warn;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Period used by [`Monitor::start_default`].
pub const DEFAULT_MONITOR_PERIOD: Duration = Duration::from_secs(5);

/// A device driver capable of refreshing its readings over the bus.
#[async_trait]
pub trait MBusDevice: Send {
    /// Polls the device and updates its cached readings.
    async fn refresh(&mut self) -> Result<(), MBusError>;
}

/// Periodic refresh task for one device.
///
/// A tick is skipped when the previous refresh is still running, so slow
/// exchanges never pile up behind each other.
pub struct Monitor {
    handle: JoinHandle<()>,
}

impl Monitor {
    /// Starts monitoring `device` with the default 5 s period.
    pub fn start_default<D>(device: Arc<Mutex<D>>) -> Self
    where
        D: MBusDevice + 'static,
    {
        Self::start(device, DEFAULT_MONITOR_PERIOD)
    }

    /// Starts a task refreshing `device` every `period`.
    pub fn start<D>(device: Arc<Mutex<D>>, period: Duration) -> Self
    where
        D: MBusDevice + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // still refreshing from the previous tick; skip this one
                let Ok(mut device) = device.try_lock() else {
                    continue;
                };
                if let Err(e) = device.refresh().await {
                    log_warn(&format!("device refresh failed: {e}"));
                }
            }
        });
        Monitor { handle }
    }

    /// Whether the monitoring task is still alive.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the monitoring task.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
