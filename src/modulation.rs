use crate::error::{Result, ToneCipherError};
use crate::pcm::PcmBuffer;
use crate::protocol::{FrequencyMap, MAX_CHAR_CODE};
use crate::Config;
use log::{debug, warn};
use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

/// Synthesizes one pure sine segment per character, back to back.
pub struct ToneModulator {
    config: Config,
    frequency_map: FrequencyMap,
    segment_len: usize,
}

impl ToneModulator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let frequency_map = config.frequency_map();
        let segment_len = config.samples_per_char(config.sample_rate);

        Ok(Self {
            config,
            frequency_map,
            segment_len,
        })
    }

    /// One character segment of a unit-amplitude sine at `frequency`.
    pub fn generate_tone(&self, frequency: f64) -> Vec<f64> {
        let sample_rate = self.config.sample_rate as f64;

        (0..self.segment_len)
            .map(|k| {
                let t = k as f64 / sample_rate;
                (2.0 * PI * frequency * t).sin()
            })
            .collect()
    }

    pub fn modulate(&self, text: &str) -> PcmBuffer {
        let outside = text.chars().filter(|&c| c as u32 > MAX_CHAR_CODE).count();
        if outside > 0 {
            warn!(
                "{} character(s) outside 0..={} will decode as the sentinel",
                outside, MAX_CHAR_CODE
            );
        }

        self.modulate_frequencies(&self.frequency_map.text_to_frequencies(text))
    }

    pub fn modulate_frequencies(&self, frequencies: &[f64]) -> PcmBuffer {
        let mut samples = Vec::with_capacity(frequencies.len() * self.segment_len);

        for &frequency in frequencies {
            samples.extend(self.generate_tone(frequency));
        }

        debug!(
            "Modulated {} segment(s) of {} samples at {} Hz",
            frequencies.len(),
            self.segment_len,
            self.config.sample_rate
        );

        PcmBuffer::from_normalized(self.config.sample_rate, &samples)
    }

    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    pub fn frequency_map(&self) -> &FrequencyMap {
        &self.frequency_map
    }
}

/// Recovers characters from fixed-length chunks by picking the strongest FFT bin.
pub struct ToneDemodulator {
    config: Config,
    frequency_map: FrequencyMap,
    fft_planner: FftPlanner<f64>,
}

impl ToneDemodulator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let frequency_map = config.frequency_map();

        Ok(Self {
            config,
            frequency_map,
            fft_planner: FftPlanner::new(),
        })
    }

    /// `(frequency, magnitude)` for the non-negative half of the chunk's spectrum.
    pub fn analyze_spectrum(&mut self, chunk: &[f64], sample_rate: u32) -> Vec<(f64, f64)> {
        let fft_size = chunk.len();
        if fft_size == 0 {
            return Vec::new();
        }

        let fft = self.fft_planner.plan_fft_forward(fft_size);

        let mut input: Vec<Complex<f64>> = chunk.iter().map(|&s| Complex::new(s, 0.0)).collect();

        fft.process(&mut input);

        let freq_resolution = sample_rate as f64 / fft_size as f64;

        input
            .iter()
            .take(fft_size / 2)
            .enumerate()
            .map(|(i, c)| {
                let freq = i as f64 * freq_resolution;
                let magnitude = (c.re * c.re + c.im * c.im).sqrt();
                (freq, magnitude)
            })
            .collect()
    }

    /// Frequency of the strongest bin. Equal magnitudes resolve to the lowest bin.
    pub fn dominant_frequency(&mut self, chunk: &[f64], sample_rate: u32) -> f64 {
        let mut best_freq = 0.0f64;
        let mut best_magnitude = f64::NEG_INFINITY;

        for (freq, magnitude) in self.analyze_spectrum(chunk, sample_rate) {
            if magnitude > best_magnitude {
                best_magnitude = magnitude;
                best_freq = freq;
            }
        }

        best_freq.abs()
    }

    /// Dominant frequency of every whole chunk, in order. A trailing partial chunk is dropped.
    pub fn demodulate_frequencies(&mut self, buffer: &PcmBuffer) -> Result<Vec<f64>> {
        buffer.ensure_mono_16bit()?;

        let chunk_size = self.config.samples_per_char(buffer.sample_rate);
        if chunk_size == 0 {
            return Err(ToneCipherError::FormatMismatch(format!(
                "sample rate {} Hz gives an empty {} ms chunk",
                buffer.sample_rate, self.config.char_duration_ms
            )));
        }

        let samples = buffer.normalized();
        let num_chunks = samples.len() / chunk_size;
        let remainder = samples.len() % chunk_size;
        if remainder > 0 {
            warn!(
                "Dropping {} trailing sample(s) shorter than one {}-sample chunk",
                remainder, chunk_size
            );
        }

        debug!(
            "Demodulating {} chunk(s) of {} samples at {} Hz",
            num_chunks, chunk_size, buffer.sample_rate
        );

        let frequencies = samples
            .chunks_exact(chunk_size)
            .map(|chunk| self.dominant_frequency(chunk, buffer.sample_rate))
            .collect();

        Ok(frequencies)
    }

    pub fn demodulate(&mut self, buffer: &PcmBuffer) -> Result<String> {
        let frequencies = self.demodulate_frequencies(buffer)?;
        Ok(self.frequency_map.frequencies_to_text(&frequencies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SENTINEL_CHAR;

    fn roundtrip(config: Config, text: &str) -> String {
        let modulator = ToneModulator::new(config.clone()).unwrap();
        let mut demodulator = ToneDemodulator::new(config).unwrap();
        let buffer = modulator.modulate(text);
        demodulator.demodulate(&buffer).unwrap()
    }

    #[test]
    fn test_modulation_roundtrip() {
        let text = "Hello, Tone-Cipher!";
        assert_eq!(roundtrip(Config::default(), text), text);
    }

    #[test]
    fn test_roundtrip_all_ascii() {
        let text: String = (0..=MAX_CHAR_CODE).filter_map(char::from_u32).collect();
        assert_eq!(roundtrip(Config::default(), &text), text);
    }

    #[test]
    fn test_segment_length() {
        let modulator = ToneModulator::new(Config::default()).unwrap();
        assert_eq!(modulator.segment_len(), 8820);

        let buffer = modulator.modulate("AB");
        assert_eq!(buffer.samples.len(), 17640);
        assert_eq!(buffer.sample_rate, 44100);
        assert_eq!(buffer.channels, 1);
        assert_eq!(buffer.bits_per_sample, 16);
    }

    #[test]
    fn test_tone_shape() {
        let modulator = ToneModulator::new(Config::default()).unwrap();
        let tone = modulator.generate_tone(3750.0);

        assert_eq!(tone[0], 0.0);
        assert!(tone.iter().all(|s| (-1.0..=1.0).contains(s)));

        let buffer = modulator.modulate("A");
        let peak = buffer.samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak > 32000);
    }

    #[test]
    fn test_empty_text() {
        let modulator = ToneModulator::new(Config::default()).unwrap();
        let buffer = modulator.modulate("");
        assert!(buffer.is_empty());

        let mut demodulator = ToneDemodulator::new(Config::default()).unwrap();
        assert_eq!(demodulator.demodulate(&buffer).unwrap(), "");
    }

    #[test]
    fn test_trailing_partial_chunk_dropped() {
        let modulator = ToneModulator::new(Config::default()).unwrap();
        let mut buffer = modulator.modulate("Hi");
        buffer.samples.extend(vec![1000i16; 8819]);

        let mut demodulator = ToneDemodulator::new(Config::default()).unwrap();
        assert_eq!(demodulator.demodulate(&buffer).unwrap(), "Hi");

        let short = PcmBuffer::mono(44100, buffer.samples[..8819].to_vec());
        assert_eq!(demodulator.demodulate(&short).unwrap(), "");
    }

    #[test]
    fn test_decode_honors_buffer_sample_rate() {
        let encode_config = Config {
            sample_rate: 48000,
            ..Default::default()
        };
        let modulator = ToneModulator::new(encode_config).unwrap();
        let buffer = modulator.modulate("Rate");
        assert_eq!(buffer.samples.len(), 4 * 9600);

        // Decoder is configured for 44100 Hz but must use the buffer's rate.
        let mut demodulator = ToneDemodulator::new(Config::default()).unwrap();
        assert_eq!(demodulator.demodulate(&buffer).unwrap(), "Rate");
    }

    #[test]
    fn test_silence_decodes_to_sentinel() {
        // All bins tie at zero, so the lowest bin (0 Hz) wins.
        let buffer = PcmBuffer::mono(44100, vec![0; 8820 * 2]);
        let mut demodulator = ToneDemodulator::new(Config::default()).unwrap();

        let frequencies = demodulator.demodulate_frequencies(&buffer).unwrap();
        assert_eq!(frequencies, vec![0.0, 0.0]);
        assert_eq!(demodulator.demodulate(&buffer).unwrap(), "??");
    }

    #[test]
    fn test_non_ascii_decodes_to_sentinel() {
        let decoded = roundtrip(Config::default(), "aéb");
        assert_eq!(decoded, format!("a{}b", SENTINEL_CHAR));
    }

    #[test]
    fn test_demodulate_frequencies_exact() {
        let modulator = ToneModulator::new(Config::default()).unwrap();
        let buffer = modulator.modulate_frequencies(&[4100.0, 5750.0]);

        let mut demodulator = ToneDemodulator::new(Config::default()).unwrap();
        let frequencies = demodulator.demodulate_frequencies(&buffer).unwrap();
        assert_eq!(frequencies.len(), 2);
        assert!((frequencies[0] - 4100.0).abs() < 1e-6);
        assert!((frequencies[1] - 5750.0).abs() < 1e-6);
    }

    #[test]
    fn test_spectrum_peak() {
        let mut demodulator = ToneDemodulator::new(Config::default()).unwrap();
        let samples: Vec<f64> = (0..8820)
            .map(|i| (2.0 * PI * 1000.0 * i as f64 / 44100.0).sin())
            .collect();

        let spectrum = demodulator.analyze_spectrum(&samples, 44100);
        assert_eq!(spectrum.len(), 4410);
        assert_eq!(spectrum[1].0, 5.0);

        let dominant = demodulator.dominant_frequency(&samples, 44100);
        assert!((dominant - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_unsupported_layout() {
        let mut demodulator = ToneDemodulator::new(Config::default()).unwrap();

        let mut stereo = PcmBuffer::mono(44100, vec![0; 8820 * 2]);
        stereo.channels = 2;
        assert!(matches!(
            demodulator.demodulate(&stereo),
            Err(ToneCipherError::FormatMismatch(_))
        ));

        let zero_rate = PcmBuffer::mono(0, vec![0; 100]);
        assert!(matches!(
            demodulator.demodulate(&zero_rate),
            Err(ToneCipherError::FormatMismatch(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            char_duration_ms: 0,
            ..Default::default()
        };
        assert!(ToneModulator::new(config.clone()).is_err());
        assert!(ToneDemodulator::new(config).is_err());
    }
}
