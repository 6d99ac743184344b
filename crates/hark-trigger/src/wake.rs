use crate::engine::WakeEngine;
use crate::{TriggerEvent, TriggerSource};
use hark_audio::capture::f32_to_i16;
use hark_audio::{DeviceNegotiator, InputStream};
use hark_core::{AudioError, TriggerError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Source of fixed-length int16 mono frames for the detector loop.
pub trait FrameSource {
    fn next_frame(&mut self, out: &mut [i16], stop: &AtomicBool) -> Result<(), AudioError>;
    /// Drop frames buffered while the pipeline was busy elsewhere, so a
    /// re-armed listener does not replay its own command window.
    fn discard_pending(&mut self);
}

/// Microphone-backed frame source. The stream is opened once, at the
/// detector's required rate, and stays open for the session.
pub struct MicFrames {
    stream: InputStream,
    scratch: Vec<f32>,
}

impl MicFrames {
    pub fn open(
        negotiator: &DeviceNegotiator,
        device_name: &str,
        sample_rate: u32,
        frame_length: usize,
    ) -> Result<Self, TriggerError> {
        let device = negotiator.get_input_device(device_name)?;

        // Mono first, stereo as the fallback, mirroring capture negotiation
        let mut last_err = None;
        for channels in [1u16, 2] {
            match InputStream::open(&device, sample_rate, channels, frame_length as u32) {
                Ok(stream) => {
                    tracing::debug!(
                        device = device_name,
                        sample_rate,
                        channels,
                        frame_length,
                        "wake frame stream opened"
                    );
                    return Ok(Self {
                        stream,
                        scratch: Vec::new(),
                    });
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err
            .unwrap_or_else(|| AudioError::StreamBuild("no channel layout accepted".to_string()))
            .into())
    }
}

impl FrameSource for MicFrames {
    fn next_frame(&mut self, out: &mut [i16], stop: &AtomicBool) -> Result<(), AudioError> {
        let channels = self.stream.channels() as usize;
        self.scratch.resize(out.len() * channels, 0.0);
        self.stream.read_exact(&mut self.scratch, stop)?;

        for (sample, frame) in out.iter_mut().zip(self.scratch.chunks(channels)) {
            *sample = f32_to_i16(frame[0]);
        }
        Ok(())
    }

    fn discard_pending(&mut self) {
        let mut scratch = [0.0f32; 256];
        let mut dropped = 0usize;
        loop {
            let n = self.stream.read_available(&mut scratch);
            if n == 0 {
                break;
            }
            dropped += n;
        }
        if dropped > 0 {
            tracing::trace!(dropped, "discarded stale wake frames");
        }
    }
}

/// Wake-word trigger: feeds streaming frames to the engine until it reports
/// a keyword index. This loop is the hard-real-time path; no blocking STT
/// or speech-output work happens inside it.
pub struct WakeTrigger<S> {
    frames: S,
    engine: Box<dyn WakeEngine>,
    stop: Arc<AtomicBool>,
    frame: Vec<i16>,
}

impl WakeTrigger<MicFrames> {
    /// Open the dedicated low-latency stream for an already-initialized
    /// engine and wrap both as a trigger source.
    pub fn open(
        negotiator: &DeviceNegotiator,
        device_name: &str,
        engine: Box<dyn WakeEngine>,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, TriggerError> {
        let frames = MicFrames::open(
            negotiator,
            device_name,
            engine.sample_rate(),
            engine.frame_length(),
        )?;
        Ok(Self::new(frames, engine, stop))
    }
}

impl<S: FrameSource> WakeTrigger<S> {
    pub fn new(frames: S, engine: Box<dyn WakeEngine>, stop: Arc<AtomicBool>) -> Self {
        let frame = vec![0i16; engine.frame_length()];
        Self {
            frames,
            engine,
            stop,
            frame,
        }
    }
}

impl<S: FrameSource> TriggerSource for WakeTrigger<S> {
    fn wait_for_trigger(&mut self) -> Result<TriggerEvent, TriggerError> {
        self.frames.discard_pending();

        loop {
            if self.stop.load(Ordering::Relaxed) {
                return Ok(TriggerEvent::Stop);
            }

            match self.frames.next_frame(&mut self.frame, &self.stop) {
                Ok(()) => {}
                Err(AudioError::Cancelled) => return Ok(TriggerEvent::Stop),
                Err(e) => return Err(e.into()),
            }

            let index = self.engine.process(&self.frame)?;
            if index >= 0 {
                tracing::debug!(index, "wake word detected");
                return Ok(TriggerEvent::Ready);
            }
        }
    }
}
