use crate::error::{Result, ToneCipherError};
use crate::pcm::{PcmBuffer, PCM_SCALE};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, StreamConfig};
use log::{debug, error};
use std::sync::{Arc, Mutex};

fn lock_err<T>(_: T) -> ToneCipherError {
    ToneCipherError::AudioDevice("audio buffer lock poisoned".into())
}

pub struct AudioOutput {
    device: Device,
}

impl AudioOutput {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| ToneCipherError::AudioDevice("No output device found".into()))?;

        Ok(Self { device })
    }

    /// Plays a mono buffer at its own sample rate and blocks until it has drained.
    pub fn play(&self, buffer: &PcmBuffer) -> Result<()> {
        buffer.ensure_mono_16bit()?;

        let config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(buffer.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let samples: Vec<f32> = buffer
            .samples
            .iter()
            .map(|&s| (s as f64 / PCM_SCALE) as f32)
            .collect();
        let samples = Arc::new(samples);
        let position = Arc::new(Mutex::new(0usize));
        let finished = Arc::new(Mutex::new(false));

        let samples_clone = Arc::clone(&samples);
        let position_clone = Arc::clone(&position);
        let finished_clone = Arc::clone(&finished);

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let (Ok(mut pos), Ok(mut done)) = (position_clone.lock(), finished_clone.lock())
                    else {
                        return;
                    };

                    for sample in data.iter_mut() {
                        if *pos < samples_clone.len() {
                            *sample = samples_clone[*pos];
                            *pos += 1;
                        } else {
                            *sample = 0.0;
                            *done = true;
                        }
                    }
                },
                |err| error!("Audio output error: {}", err),
                None,
            )
            .map_err(|e| ToneCipherError::AudioDevice(e.to_string()))?;

        stream
            .play()
            .map_err(|e| ToneCipherError::AudioDevice(e.to_string()))?;

        debug!(
            "Playing {} samples at {} Hz",
            samples.len(),
            buffer.sample_rate
        );

        loop {
            std::thread::sleep(std::time::Duration::from_millis(10));
            if *finished.lock().map_err(lock_err)? {
                break;
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(100));

        Ok(())
    }
}

pub struct AudioInput {
    device: Device,
    config: StreamConfig,
}

impl AudioInput {
    pub fn new(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| ToneCipherError::AudioDevice("No input device found".into()))?;

        let config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self { device, config })
    }

    /// Captures `duration_ms` of mono audio and quantizes it to 16-bit PCM.
    pub fn record(&self, duration_ms: u32) -> Result<PcmBuffer> {
        let sample_rate = self.config.sample_rate.0;
        let num_samples = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
        let samples = Arc::new(Mutex::new(Vec::with_capacity(num_samples)));
        let samples_clone = Arc::clone(&samples);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut samples) = samples_clone.lock() {
                        samples.extend_from_slice(data);
                    }
                },
                |err| error!("Audio input error: {}", err),
                None,
            )
            .map_err(|e| ToneCipherError::AudioDevice(e.to_string()))?;

        stream
            .play()
            .map_err(|e| ToneCipherError::AudioDevice(e.to_string()))?;

        std::thread::sleep(std::time::Duration::from_millis(duration_ms as u64));

        drop(stream);

        let captured = samples.lock().map_err(lock_err)?;
        let normalized: Vec<f64> = captured
            .iter()
            .take(num_samples)
            .map(|&s| s as f64)
            .collect();

        debug!("Recorded {} samples at {} Hz", normalized.len(), sample_rate);

        Ok(PcmBuffer::from_normalized(sample_rate, &normalized))
    }
}

pub fn list_audio_devices() -> Vec<String> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let Ok(name) = device.name() {
                devices.push(format!("Output: {}", name));
            }
        }
    }

    if let Ok(input_devices) = host.input_devices() {
        for device in input_devices {
            if let Ok(name) = device.name() {
                devices.push(format!("Input: {}", name));
            }
        }
    }

    devices
}
