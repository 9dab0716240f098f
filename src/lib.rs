pub mod protocol;
pub mod pcm;
pub mod modulation;
pub mod audio;
pub mod wav;
pub mod error;
pub mod codec;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use protocol::*;
pub use pcm::*;
pub use modulation::*;
pub use error::*;
pub use codec::*;

pub const SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_CHAR_DURATION_MS: u32 = 200;
pub const BASE_FREQUENCY: f64 = 500.0;
pub const FREQ_STEP: f64 = 50.0;

/// Immutable parameters shared by the encoder and the decoder.
///
/// The decoder reads `sample_rate` from the buffer it is given; only the
/// duration and the frequency mapping are taken from here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub sample_rate: u32,
    pub char_duration_ms: u32,
    pub base_frequency: f64,
    pub frequency_step: f64,
}

impl Config {
    /// Samples in one character segment at `sample_rate`, rounded to nearest.
    pub fn samples_per_char(&self, sample_rate: u32) -> usize {
        let scaled = sample_rate as u64 * self.char_duration_ms as u64;
        ((scaled + 500) / 1000) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneCipherError::InvalidConfig("sample rate must be non-zero".into()));
        }
        if self.char_duration_ms == 0 {
            return Err(ToneCipherError::InvalidConfig(
                "character duration must be non-zero".into(),
            ));
        }
        if !self.base_frequency.is_finite() {
            return Err(ToneCipherError::InvalidConfig(format!(
                "base frequency must be finite, got {}",
                self.base_frequency
            )));
        }
        if !self.frequency_step.is_finite() || self.frequency_step <= 0.0 {
            return Err(ToneCipherError::InvalidConfig(format!(
                "frequency step must be positive, got {}",
                self.frequency_step
            )));
        }
        Ok(())
    }

    pub fn frequency_map(&self) -> FrequencyMap {
        FrequencyMap::new(self.base_frequency, self.frequency_step)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            char_duration_ms: DEFAULT_CHAR_DURATION_MS,
            base_frequency: BASE_FREQUENCY,
            frequency_step: FREQ_STEP,
        }
    }
}
