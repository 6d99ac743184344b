use crate::device::DeviceNegotiator;
use crate::stream::InputStream;
use hark_core::{AudioBuffer, AudioError, CaptureConfig};
use std::sync::atomic::AtomicBool;

/// Record one fixed capture window described by `config`.
///
/// Reads the stream in fixed-size blocks until the target sample count is
/// reached. When the stream delivers two channels only channel 0 is
/// retained; the final block is truncated so the buffer length is exactly
/// `config.target_samples()`. A mid-capture stream error fails this attempt
/// without retrying; the caller decides whether to re-negotiate.
pub fn capture(
    negotiator: &DeviceNegotiator,
    config: &CaptureConfig,
    stop: &AtomicBool,
) -> Result<AudioBuffer, AudioError> {
    let device = negotiator.get_input_device(&config.device_name)?;
    let mut stream = InputStream::open(
        &device,
        config.sample_rate,
        config.channels,
        config.block_frames,
    )?;

    let target = config.target_samples();
    let mut samples = Vec::with_capacity(target);
    let mut block = vec![0.0f32; config.block_frames as usize * config.channels as usize];

    while samples.len() < target {
        stream.read_exact(&mut block, stop)?;
        append_first_channel(&block, config.channels, target, &mut samples);
    }

    tracing::debug!(
        samples = samples.len(),
        rate = config.sample_rate,
        "capture window complete"
    );

    Ok(AudioBuffer {
        samples,
        sample_rate: config.sample_rate,
    })
}

/// Append channel 0 of an interleaved block as i16, stopping at `target`.
/// Down-mix is by channel selection, not averaging.
fn append_first_channel(block: &[f32], channels: u16, target: usize, out: &mut Vec<i16>) {
    let step = channels.max(1) as usize;
    for frame in block.chunks(step) {
        if out.len() >= target {
            break;
        }
        out.push(f32_to_i16(frame[0]));
    }
}

/// Convert an f32 sample in [-1.0, 1.0] to i16.
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}
