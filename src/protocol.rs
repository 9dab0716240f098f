use crate::error::{Result, ToneCipherError};
use crate::{BASE_FREQUENCY, FREQ_STEP};

pub const MAX_CHAR_CODE: u32 = 127;
pub const SENTINEL_CHAR: char = '?';

/// Linear mapping between character codes and carrier frequencies.
///
/// `frequency = base + code * step`. Only codes in `0..=MAX_CHAR_CODE` survive
/// the inverse; anything else comes back as [`SENTINEL_CHAR`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMap {
    base_frequency: f64,
    frequency_step: f64,
}

impl FrequencyMap {
    pub fn new(base_frequency: f64, frequency_step: f64) -> Self {
        Self {
            base_frequency,
            frequency_step,
        }
    }

    pub fn code_to_frequency(&self, code: u32) -> f64 {
        self.base_frequency + code as f64 * self.frequency_step
    }

    pub fn char_to_frequency(&self, c: char) -> f64 {
        self.code_to_frequency(c as u32)
    }

    /// Nearest character code for `frequency`. Halfway values round away from zero.
    pub fn frequency_to_char(&self, frequency: f64) -> char {
        let code = ((frequency - self.base_frequency) / self.frequency_step).round();
        if !(0.0..=MAX_CHAR_CODE as f64).contains(&code) {
            return SENTINEL_CHAR;
        }
        char::from_u32(code as u32).unwrap_or(SENTINEL_CHAR)
    }

    /// Highest frequency that decodes to a valid character.
    pub fn max_frequency(&self) -> f64 {
        self.code_to_frequency(MAX_CHAR_CODE)
    }

    pub fn text_to_frequencies(&self, text: &str) -> Vec<f64> {
        text.chars().map(|c| self.char_to_frequency(c)).collect()
    }

    pub fn frequencies_to_text(&self, frequencies: &[f64]) -> String {
        frequencies.iter().map(|&f| self.frequency_to_char(f)).collect()
    }
}

impl Default for FrequencyMap {
    fn default() -> Self {
        Self::new(BASE_FREQUENCY, FREQ_STEP)
    }
}

/// Parses a human-entered list such as `[4100, 5750]` or `4100,5750`.
pub fn parse_frequency_list(input: &str) -> Result<Vec<f64>> {
    let trimmed = input.trim();
    let inner = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| ToneCipherError::Parse {
                token: token.to_string(),
            })
        })
        .collect()
}

pub fn format_frequency_list(frequencies: &[f64]) -> String {
    let items: Vec<String> = frequencies.iter().map(|f| f.to_string()).collect();
    format!("[{}]", items.join(", "))
}
