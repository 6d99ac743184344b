use crate::stream::InputStream;
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};
use hark_core::{AudioDeviceCandidate, AudioError, CaptureConfig};
use std::time::Duration;

/// Fallback rates tried after the device default and the user preference.
pub const FALLBACK_RATES: [u32; 6] = [44100, 48000, 32000, 24000, 22050, 16000];

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

pub struct DeviceNegotiator {
    host: Host,
}

impl DeviceNegotiator {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    pub fn list_input_devices(&self) -> Result<Vec<(String, Device)>, AudioError> {
        let devices = self
            .host
            .input_devices()
            .map_err(|e| AudioError::DeviceEnumeration(e.to_string()))?;

        let mut result = Vec::new();
        for device in devices {
            let name = device.name().unwrap_or_else(|_| "unknown".to_string());
            result.push((name, device));
        }
        Ok(result)
    }

    pub fn get_input_device(&self, name: &str) -> Result<Device, AudioError> {
        if name == "default" {
            return self
                .host
                .default_input_device()
                .ok_or(AudioError::NoInputDevice);
        }

        let devices = self.list_input_devices()?;
        for (dev_name, device) in devices {
            if dev_name == name {
                return Ok(device);
            }
        }
        Err(AudioError::DeviceNotFound(name.to_string()))
    }

    /// Find a (device, rate, channels) triple that can actually be opened
    /// and read. The first fully successful open wins; every failed attempt
    /// is swallowed and recorded, and only total exhaustion is surfaced.
    pub fn negotiate(
        &self,
        preferred_rate: Option<u32>,
        capture_seconds: f32,
        block_frames: u32,
    ) -> Result<CaptureConfig, AudioError> {
        let devices = self.list_input_devices()?;
        if devices.is_empty() {
            return Err(AudioError::NoInputDevice);
        }

        let mut attempts = 0usize;
        let mut last_error = String::from("no candidate attempted");

        for (name, device) in &devices {
            let candidate = snapshot_candidate(device, name, preferred_rate);
            tracing::debug!(
                device = %candidate.name,
                rates = ?candidate.rates,
                max_channels = candidate.max_channels,
                "probing input device"
            );

            for &rate in &candidate.rates {
                for channels in channel_order(candidate.max_channels) {
                    attempts += 1;
                    match probe_open(device, rate, channels, block_frames) {
                        Ok(()) => {
                            tracing::info!(
                                device = %candidate.name,
                                rate,
                                channels,
                                "negotiated input configuration"
                            );
                            return Ok(CaptureConfig {
                                device_name: candidate.name.clone(),
                                sample_rate: rate,
                                channels,
                                capture_seconds,
                                block_frames,
                            });
                        }
                        Err(e) => {
                            tracing::debug!(
                                device = %candidate.name,
                                rate,
                                channels,
                                "candidate failed: {e}"
                            );
                            last_error = e.to_string();
                        }
                    }
                }
            }
        }

        Err(AudioError::NegotiationExhausted {
            attempts,
            last: last_error,
        })
    }
}

impl Default for DeviceNegotiator {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable per-device snapshot: name, candidate rate ladder, channel ceiling.
fn snapshot_candidate(
    device: &Device,
    name: &str,
    preferred_rate: Option<u32>,
) -> AudioDeviceCandidate {
    let default_rate = device
        .default_input_config()
        .ok()
        .map(|c| c.sample_rate().0);
    let max_channels = device
        .supported_input_configs()
        .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(1))
        .unwrap_or(1);

    AudioDeviceCandidate {
        name: name.to_string(),
        rates: rate_ladder(default_rate, preferred_rate),
        max_channels,
    }
}

fn probe_open(
    device: &Device,
    rate: u32,
    channels: u16,
    block_frames: u32,
) -> Result<(), AudioError> {
    let mut stream = InputStream::open(device, rate, channels, block_frames)?;
    stream.wait_for_data(PROBE_TIMEOUT)?;
    Ok(())
}

/// Candidate rate list: device default first, then the preferred rate, then
/// the fixed fallback ladder, de-duplicated preserving order.
pub fn rate_ladder(default_rate: Option<u32>, preferred_rate: Option<u32>) -> Vec<u32> {
    let mut rates = Vec::new();
    for rate in default_rate
        .into_iter()
        .chain(preferred_rate)
        .chain(FALLBACK_RATES)
    {
        if !rates.contains(&rate) {
            rates.push(rate);
        }
    }
    rates
}

/// Mono first; stereo only when the device reports at least two channels.
pub fn channel_order(max_channels: u16) -> Vec<u16> {
    if max_channels >= 2 {
        vec![1, 2]
    } else {
        vec![1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_ladder_default_and_preference_lead() {
        let rates = rate_ladder(Some(48000), Some(16000));
        assert_eq!(rates[0], 48000);
        assert_eq!(rates[1], 16000);
        assert_eq!(&rates[2..], &[44100, 32000, 24000, 22050]);
    }

    #[test]
    fn test_rate_ladder_deduplicates_preserving_order() {
        let rates = rate_ladder(Some(44100), Some(44100));
        assert_eq!(rates, vec![44100, 48000, 32000, 24000, 22050, 16000]);
    }

    #[test]
    fn test_rate_ladder_without_default_or_preference() {
        let rates = rate_ladder(None, None);
        assert_eq!(rates, FALLBACK_RATES.to_vec());
    }

    #[test]
    fn test_rate_ladder_unusual_default_is_kept() {
        let rates = rate_ladder(Some(8000), None);
        assert_eq!(rates[0], 8000);
        assert_eq!(rates.len(), FALLBACK_RATES.len() + 1);
    }

    #[test]
    fn test_channel_order_mono_device() {
        assert_eq!(channel_order(1), vec![1]);
    }

    #[test]
    fn test_channel_order_stereo_device_prefers_mono() {
        assert_eq!(channel_order(2), vec![1, 2]);
        assert_eq!(channel_order(8), vec![1, 2]);
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_negotiate_on_real_hardware() {
        let negotiator = DeviceNegotiator::new();
        let config = negotiator.negotiate(None, 1.0, 1024).unwrap();
        println!(
            "negotiated: {} @ {}Hz, {} ch",
            config.device_name, config.sample_rate, config.channels
        );
        assert!(config.channels >= 1);
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_negotiate_is_idempotent_for_unchanged_devices() {
        let negotiator = DeviceNegotiator::new();
        let first = negotiator.negotiate(None, 1.0, 1024).unwrap();
        let second = negotiator.negotiate(None, 1.0, 1024).unwrap();
        assert_eq!(first, second);
    }
}
