use crate::error::{Result, ToneCipherError};

/// Full-scale value used when quantizing to and from 16-bit samples.
pub const PCM_SCALE: f64 = 32767.0;

/// In-memory 16-bit PCM audio with the format fields a container carries.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub samples: Vec<i16>,
}

impl PcmBuffer {
    pub fn mono(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
            samples,
        }
    }

    /// Quantizes normalized samples in `[-1.0, 1.0]`; out-of-range input is clamped.
    pub fn from_normalized(sample_rate: u32, samples: &[f64]) -> Self {
        Self::mono(sample_rate, samples.iter().map(|&s| quantize(s)).collect())
    }

    /// Fails unless the buffer is mono 16-bit, the only layout the codec reads.
    pub fn ensure_mono_16bit(&self) -> Result<()> {
        if self.channels != 1 {
            return Err(ToneCipherError::FormatMismatch(format!(
                "expected mono audio, got {} channels",
                self.channels
            )));
        }
        if self.bits_per_sample != 16 {
            return Err(ToneCipherError::FormatMismatch(format!(
                "expected 16-bit samples, got {} bits",
                self.bits_per_sample
            )));
        }
        Ok(())
    }

    pub fn normalized(&self) -> Vec<f64> {
        self.samples.iter().map(|&s| s as f64 / PCM_SCALE).collect()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

pub fn quantize(sample: f64) -> i16 {
    (sample * PCM_SCALE).round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}
