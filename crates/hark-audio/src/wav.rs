use hark_core::{AudioBuffer, AudioError};
use std::path::Path;

/// Write a buffer as a mono 16-bit PCM WAV file.
pub fn write_wav(buffer: &AudioBuffer, path: &Path) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| AudioError::Wav(e.to_string()))?;
    for &sample in &buffer.samples {
        writer
            .write_sample(sample)
            .map_err(|e| AudioError::Wav(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| AudioError::Wav(e.to_string()))?;

    Ok(())
}

/// Read a mono 16-bit PCM WAV file back into a buffer.
pub fn read_wav(path: &Path) -> Result<AudioBuffer, AudioError> {
    let mut reader = hound::WavReader::open(path).map_err(|e| AudioError::Wav(e.to_string()))?;
    let spec = reader.spec();
    if spec.channels != 1 || spec.bits_per_sample != 16 {
        return Err(AudioError::Wav(format!(
            "expected mono 16-bit PCM, got {} ch / {} bit",
            spec.channels, spec.bits_per_sample
        )));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AudioError::Wav(e.to_string()))?;

    Ok(AudioBuffer {
        samples,
        sample_rate: spec.sample_rate,
    })
}
