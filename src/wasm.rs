#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::{
    modulation::{ToneDemodulator, ToneModulator},
    pcm::{PcmBuffer, PCM_SCALE},
    protocol::parse_frequency_list,
    Config,
};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ToneCipherWasm {
    config: Config,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ToneCipherWasm {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();

        Self {
            config: Config::default(),
        }
    }

    #[wasm_bindgen]
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.config.sample_rate = sample_rate;
    }

    #[wasm_bindgen]
    pub fn set_char_duration(&mut self, duration_ms: u32) {
        self.config.char_duration_ms = duration_ms;
    }

    /// Normalized samples ready for an `AudioBuffer`.
    #[wasm_bindgen]
    pub fn encode_text(&self, text: &str) -> Result<Vec<f32>, JsValue> {
        let modulator = ToneModulator::new(self.config.clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let buffer = modulator.modulate(text);

        Ok(buffer
            .samples
            .iter()
            .map(|&s| (s as f64 / PCM_SCALE) as f32)
            .collect())
    }

    /// Decodes samples captured in the browser at `sample_rate`.
    #[wasm_bindgen]
    pub fn decode_samples(&self, samples: &[f32], sample_rate: u32) -> Result<String, JsValue> {
        let normalized: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
        let buffer = PcmBuffer::from_normalized(sample_rate, &normalized);

        let mut demodulator = ToneDemodulator::new(self.config.clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        demodulator
            .demodulate(&buffer)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn text_to_frequencies(&self, text: &str) -> Vec<f64> {
        self.config.frequency_map().text_to_frequencies(text)
    }

    #[wasm_bindgen]
    pub fn frequencies_to_text(&self, frequencies: &str) -> Result<String, JsValue> {
        let frequencies =
            parse_frequency_list(frequencies).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.config.frequency_map().frequencies_to_text(&frequencies))
    }

    #[wasm_bindgen]
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    #[wasm_bindgen]
    pub fn samples_per_char(&self) -> u32 {
        self.config.samples_per_char(self.config.sample_rate) as u32
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for ToneCipherWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
}
