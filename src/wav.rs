//! RIFF/WAVE container for [`PcmBuffer`]: uncompressed, little-endian, 16-bit mono.

use crate::error::{Result, ToneCipherError};
use crate::pcm::PcmBuffer;
use byteorder::{LittleEndian, WriteBytesExt};
use log::warn;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const WAV_HEADER_SIZE: usize = 44;
const FORMAT_PCM: u16 = 1;
const BLOCK_ALIGN: u16 = 2;

fn size_overflow(what: &str) -> ToneCipherError {
    ToneCipherError::InvalidContainer(format!("{} does not fit in a WAV header", what))
}

pub fn write_wav<W: Write>(writer: &mut W, buffer: &PcmBuffer) -> Result<()> {
    buffer.ensure_mono_16bit()?;

    let byte_rate = buffer
        .sample_rate
        .checked_mul(BLOCK_ALIGN as u32)
        .ok_or_else(|| size_overflow("byte rate"))?;
    let data_size = buffer
        .samples
        .len()
        .checked_mul(BLOCK_ALIGN as usize)
        .and_then(|size| u32::try_from(size).ok())
        .ok_or_else(|| size_overflow("data size"))?;
    let riff_size = data_size
        .checked_add(36)
        .ok_or_else(|| size_overflow("RIFF size"))?;

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(riff_size)?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(16)?;
    writer.write_u16::<LittleEndian>(FORMAT_PCM)?;
    writer.write_u16::<LittleEndian>(buffer.channels)?;
    writer.write_u32::<LittleEndian>(buffer.sample_rate)?;
    writer.write_u32::<LittleEndian>(byte_rate)?;
    writer.write_u16::<LittleEndian>(BLOCK_ALIGN)?;
    writer.write_u16::<LittleEndian>(buffer.bits_per_sample)?;

    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_size)?;
    for &sample in &buffer.samples {
        writer.write_i16::<LittleEndian>(sample)?;
    }

    Ok(())
}

pub fn to_wav_bytes(buffer: &PcmBuffer) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(WAV_HEADER_SIZE + buffer.samples.len() * 2);
    write_wav(&mut data, buffer)?;
    Ok(data)
}

/// Reads a mono 16-bit integer PCM WAV stream.
///
/// The declared data length is not trusted: the samples actually present are
/// returned when the stream ends early.
pub fn read_wav<R: Read>(reader: R) -> Result<PcmBuffer> {
    let mut reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(ToneCipherError::InvalidContainer(format!(
            "unsupported sample format {:?} (only integer PCM)",
            spec.sample_format
        )));
    }

    let header = PcmBuffer {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        samples: Vec::new(),
    };
    header.ensure_mono_16bit()?;

    let declared = reader.len();
    let mut samples = Vec::new();
    for sample in reader.samples::<i16>() {
        match sample {
            Ok(s) => samples.push(s),
            Err(hound::Error::IoError(e)) => {
                warn!(
                    "Data chunk ended after {} of {} declared samples: {}",
                    samples.len(),
                    declared,
                    e
                );
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(PcmBuffer { samples, ..header })
}

pub fn save_wav<P: AsRef<Path>>(path: P, buffer: &PcmBuffer) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_wav(&mut writer, buffer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<PcmBuffer> {
    read_wav(BufReader::new(File::open(path)?))
}
