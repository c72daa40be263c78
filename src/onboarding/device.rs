//! Smart watch pairing
//!
//! The wizard's first step pairs a wearable. Pairing itself is an injected
//! asynchronous capability so callers can plug in a real pairing flow, a
//! timed simulation, or an immediate stand-in for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::PairingError;

/// Simulated pairing latency
pub const DEFAULT_CONNECT_DELAY_MS: u64 = 2000;

/// A selectable smart watch model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceModel {
    pub id: &'static str,
    pub label: &'static str,
}

/// Models offered by the pairing step
pub static SUPPORTED_DEVICES: [DeviceModel; 8] = [
    DeviceModel { id: "apple-watch", label: "Apple Watch" },
    DeviceModel { id: "samsung-galaxy-watch", label: "Samsung Galaxy Watch" },
    DeviceModel { id: "fitbit-sense", label: "Fitbit Sense" },
    DeviceModel { id: "garmin-venu", label: "Garmin Venu" },
    DeviceModel { id: "amazfit-gts", label: "Amazfit GTS" },
    DeviceModel { id: "huawei-watch", label: "Huawei Watch" },
    DeviceModel { id: "withings-scanwatch", label: "Withings ScanWatch" },
    DeviceModel { id: "other", label: "Other Smart Watch" },
];

impl DeviceModel {
    /// Look up a supported model by id
    pub fn find(id: &str) -> Option<&'static DeviceModel> {
        SUPPORTED_DEVICES.iter().find(|d| d.id == id)
    }
}

/// Pairing sub-state of the smartwatch step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
}

impl fmt::Display for PairingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PairingStatus::Idle => "idle",
            PairingStatus::Connecting => "connecting",
            PairingStatus::Connected => "connected",
        })
    }
}

/// Confirmation returned by a successful pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedDevice {
    pub device_id: String,
    pub paired_at: DateTime<Utc>,
}

/// Capability that pairs a device
#[async_trait]
pub trait DevicePairing: Send + Sync {
    async fn pair(&self, device: &DeviceModel) -> Result<PairedDevice, PairingError>;
}

/// Pairing stand-in that waits a fixed delay and then settles
#[derive(Debug, Clone)]
pub struct SimulatedPairing {
    delay: Duration,
    failure: Option<String>,
}

impl Default for SimulatedPairing {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_CONNECT_DELAY_MS))
    }
}

impl SimulatedPairing {
    /// Succeeds after `delay`
    pub fn new(delay: Duration) -> Self {
        Self { delay, failure: None }
    }

    /// Succeeds without waiting
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Fails with `reason` after the configured delay
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }
}

#[async_trait]
impl DevicePairing for SimulatedPairing {
    async fn pair(&self, device: &DeviceModel) -> Result<PairedDevice, PairingError> {
        debug!(device = device.id, delay_ms = self.delay.as_millis() as u64, "Simulating pairing");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.failure {
            Some(reason) => Err(PairingError {
                device: device.id.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(PairedDevice {
                device_id: device.id.to_string(),
                paired_at: Utc::now(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(SUPPORTED_DEVICES.len(), 8);
        assert_eq!(DeviceModel::find("garmin-venu").unwrap().label, "Garmin Venu");
        assert!(DeviceModel::find("pebble").is_none());
    }

    #[tokio::test]
    async fn test_immediate_pairing_succeeds() {
        let device = DeviceModel::find("apple-watch").unwrap();
        let paired = SimulatedPairing::immediate().pair(device).await.unwrap();
        assert_eq!(paired.device_id, "apple-watch");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_pairing_waits_then_fails() {
        let device = DeviceModel::find("fitbit-sense").unwrap();
        let pairing = SimulatedPairing::default().failing("out of range");

        let started = tokio::time::Instant::now();
        let err = pairing.pair(device).await.unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(DEFAULT_CONNECT_DELAY_MS));
        assert_eq!(err.to_string(), "fitbit-sense: out of range");
    }
}
