use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use hark_core::AudioError;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A running cpal input stream whose callback feeds a ring buffer, read
/// from the session thread with blocking semantics.
pub struct InputStream {
    _stream: Stream,
    consumer: HeapCons<f32>,
    failed: Arc<AtomicBool>,
    channels: u16,
}

impl InputStream {
    pub fn open(
        device: &Device,
        sample_rate: u32,
        channels: u16,
        block_frames: u32,
    ) -> Result<Self, AudioError> {
        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Fixed(block_frames),
        };

        // ~2 seconds of headroom so a briefly stalled reader loses nothing
        let capacity = sample_rate as usize * channels as usize * 2;
        let (mut producer, consumer) = HeapRb::<f32>::new(capacity).split();

        let failed = Arc::new(AtomicBool::new(false));
        let failed_flag = Arc::clone(&failed);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Push as much as fits; overflow is silently dropped
                    producer.push_slice(data);
                },
                move |err: cpal::StreamError| {
                    tracing::error!("input stream error: {}", err);
                    failed_flag.store(true, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            consumer,
            failed,
            channels,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Blocking read of exactly `out.len()` interleaved samples.
    ///
    /// The stop flag and the stream's error flag are checked between polls,
    /// so cancellation takes effect between blocks, not mid-block.
    pub fn read_exact(&mut self, out: &mut [f32], stop: &AtomicBool) -> Result<(), AudioError> {
        let mut filled = 0;
        while filled < out.len() {
            if stop.load(Ordering::Relaxed) {
                return Err(AudioError::Cancelled);
            }
            if self.has_failed() {
                return Err(AudioError::Capture("stream reported an error".to_string()));
            }
            let n = self.consumer.pop_slice(&mut out[filled..]);
            filled += n;
            if n == 0 {
                std::thread::sleep(POLL_INTERVAL);
            }
        }
        Ok(())
    }

    /// Non-blocking read of whatever is buffered, up to `out.len()` samples.
    pub fn read_available(&mut self, out: &mut [f32]) -> usize {
        self.consumer.pop_slice(out)
    }

    /// Wait until any samples arrive. Used to probe candidate configurations:
    /// a stream that opens but never delivers is not a working stream.
    pub fn wait_for_data(&mut self, timeout: Duration) -> Result<usize, AudioError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.has_failed() {
                return Err(AudioError::Capture("stream reported an error".to_string()));
            }
            let available = self.consumer.occupied_len();
            if available > 0 {
                return Ok(available);
            }
            if Instant::now() >= deadline {
                return Err(AudioError::Capture(
                    "no samples arrived within probe window".to_string(),
                ));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}
