//! Entry points for callers that only need the four text/audio conversions.
//!
//! Each function builds its modulator or demodulator from the supplied
//! [`Config`]; the `*_with` variants take it explicitly, the others use
//! [`Config::default`].

use crate::error::Result;
use crate::modulation::{ToneDemodulator, ToneModulator};
use crate::pcm::PcmBuffer;
use crate::Config;

pub fn encode_text_to_audio(text: &str) -> Result<PcmBuffer> {
    encode_text_to_audio_with(&Config::default(), text)
}

pub fn encode_text_to_audio_with(config: &Config, text: &str) -> Result<PcmBuffer> {
    let modulator = ToneModulator::new(config.clone())?;
    Ok(modulator.modulate(text))
}

/// Decodes at the buffer's own sample rate, whatever `Config::sample_rate` says.
pub fn decode_audio_to_text(buffer: &PcmBuffer) -> Result<String> {
    decode_audio_to_text_with(&Config::default(), buffer)
}

pub fn decode_audio_to_text_with(config: &Config, buffer: &PcmBuffer) -> Result<String> {
    let mut demodulator = ToneDemodulator::new(config.clone())?;
    demodulator.demodulate(buffer)
}

pub fn text_to_frequencies(text: &str) -> Vec<f64> {
    text_to_frequencies_with(&Config::default(), text)
}

pub fn text_to_frequencies_with(config: &Config, text: &str) -> Vec<f64> {
    config.frequency_map().text_to_frequencies(text)
}

pub fn frequencies_to_text(frequencies: &[f64]) -> String {
    frequencies_to_text_with(&Config::default(), frequencies)
}

pub fn frequencies_to_text_with(config: &Config, frequencies: &[f64]) -> String {
    config.frequency_map().frequencies_to_text(frequencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_frequency_list;

    #[test]
    fn test_audio_roundtrip() {
        let text = "The quick brown fox jumps over the lazy dog. 0123456789";
        let buffer = encode_text_to_audio(text).unwrap();
        assert_eq!(decode_audio_to_text(&buffer).unwrap(), text);
    }

    #[test]
    fn test_encode_two_chars_length() {
        let buffer = encode_text_to_audio("AB").unwrap();
        assert_eq!(buffer.samples.len(), 2 * 8820);
    }

    #[test]
    fn test_empty_roundtrip() {
        let buffer = encode_text_to_audio("").unwrap();
        assert_eq!(buffer.samples.len(), 0);
        assert_eq!(decode_audio_to_text(&buffer).unwrap(), "");
        assert!(text_to_frequencies("").is_empty());
        assert_eq!(frequencies_to_text(&[]), "");
    }

    #[test]
    fn test_frequency_path() {
        assert_eq!(text_to_frequencies("Hi"), vec![4100.0, 5750.0]);
        assert_eq!(frequencies_to_text(&[4100.0, 5750.0]), "Hi");

        let parsed = parse_frequency_list("[4100, 5750]").unwrap();
        assert_eq!(frequencies_to_text(&parsed), "Hi");
    }

    #[test]
    fn test_frequency_path_matches_audio_path() {
        let text = "Tones!";
        let direct = frequencies_to_text(&text_to_frequencies(text));
        let audio = decode_audio_to_text(&encode_text_to_audio(text).unwrap()).unwrap();
        assert_eq!(direct, audio);
    }

    #[test]
    fn test_custom_config() {
        let config = Config {
            sample_rate: 16000,
            char_duration_ms: 100,
            base_frequency: 300.0,
            frequency_step: 40.0,
        };

        assert_eq!(text_to_frequencies_with(&config, "A"), vec![300.0 + 65.0 * 40.0]);

        let buffer = encode_text_to_audio_with(&config, "ok").unwrap();
        assert_eq!(buffer.sample_rate, 16000);
        assert_eq!(buffer.samples.len(), 2 * 1600);
        assert_eq!(decode_audio_to_text_with(&config, &buffer).unwrap(), "ok");
    }

    #[test]
    fn test_out_of_band_frequencies() {
        assert_eq!(frequencies_to_text(&[100.0, 3750.0, 10000.0]), "?A?");
    }
}
