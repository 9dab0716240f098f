use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tone_cipher_core::{
    audio::{list_audio_devices, AudioInput, AudioOutput},
    codec::{
        decode_audio_to_text_with, encode_text_to_audio_with, frequencies_to_text_with,
        text_to_frequencies_with,
    },
    protocol::{format_frequency_list, parse_frequency_list},
    wav::{load_wav, save_wav},
    Config,
};

#[derive(Parser)]
#[command(name = "tone-cipher")]
#[command(about = "Encode text as audible tones and decode it back", long_about = None)]
#[command(version)]
struct Cli {
    /// Sample rate used when synthesizing or recording
    #[arg(long, global = true, default_value = "44100")]
    sample_rate: u32,

    /// Tone duration per character in milliseconds
    #[arg(long, global = true, default_value = "200")]
    char_duration: u32,

    /// Frequency of character code 0 in Hz
    #[arg(long, global = true, default_value = "500")]
    base_frequency: f64,

    /// Frequency spacing between consecutive character codes in Hz
    #[arg(long, global = true, default_value = "50")]
    frequency_step: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text into a WAV file
    Encode {
        /// Text to encode (if not provided, reads from stdin)
        text: Option<String>,

        /// Output WAV path
        #[arg(short, long, default_value = "encoded_message.wav")]
        output: PathBuf,
    },

    /// Decode text from a WAV file
    Decode {
        /// WAV file to decode
        input: PathBuf,
    },

    /// Print the frequency array for some text
    Freqs {
        /// Text to convert
        text: String,
    },

    /// Decode a frequency array such as "[4100, 5750]"
    Unfreqs {
        /// Comma-separated frequencies, optionally bracketed
        frequencies: String,
    },

    /// Encode text and play it through the default output device
    Play {
        /// Text to play (if not provided, reads from stdin)
        text: Option<String>,
    },

    /// Record from the default input device into a WAV file
    Record {
        /// Recording length in milliseconds
        #[arg(long, default_value = "5000")]
        duration: u32,

        /// Output WAV path
        #[arg(short, long, default_value = "recording.wav")]
        output: PathBuf,
    },

    /// List available audio devices
    Devices,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = Config {
        sample_rate: cli.sample_rate,
        char_duration_ms: cli.char_duration,
        base_frequency: cli.base_frequency,
        frequency_step: cli.frequency_step,
    };
    config.validate()?;

    match cli.command {
        Commands::Encode { text, output } => {
            let text = read_text(text)?;
            encode_to_file(&text, &output, &config)?;
        }

        Commands::Decode { input } => {
            let text = decode_file(&input, &config)?;
            println!("{}", text);
        }

        Commands::Freqs { text } => {
            if text.is_empty() {
                bail!("Please enter some text");
            }
            let frequencies = text_to_frequencies_with(&config, &text);
            println!("{}", format_frequency_list(&frequencies));
        }

        Commands::Unfreqs { frequencies } => {
            if frequencies.trim().is_empty() {
                bail!("Please enter a frequency array");
            }
            let parsed = parse_frequency_list(&frequencies)?;
            println!("{}", frequencies_to_text_with(&config, &parsed));
        }

        Commands::Play { text } => {
            let text = read_text(text)?;
            let buffer = encode_text_to_audio_with(&config, &text)?;
            eprintln!(
                "Playing {} characters ({:.1} s)...",
                text.chars().count(),
                buffer.duration_secs()
            );
            AudioOutput::new()?.play(&buffer)?;
            eprintln!("Playback complete!");
        }

        Commands::Record { duration, output } => {
            eprintln!("Recording {} ms at {} Hz...", duration, config.sample_rate);
            let buffer = AudioInput::new(config.sample_rate)?.record(duration)?;
            save_wav(&output, &buffer)?;
            eprintln!("Saved {} samples to {}", buffer.len(), output.display());
        }

        Commands::Devices => {
            let devices = list_audio_devices();
            println!("Available audio devices:");
            for device in devices {
                println!("  {}", device);
            }
        }
    }

    Ok(())
}

fn read_text(text: Option<String>) -> Result<String> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if text.is_empty() {
        bail!("Please enter some text");
    }

    Ok(text)
}

fn encode_to_file(text: &str, output: &Path, config: &Config) -> Result<()> {
    eprintln!("Encoding {} characters...", text.chars().count());

    let buffer = encode_text_to_audio_with(config, text)?;
    save_wav(output, &buffer)?;

    eprintln!(
        "Wrote {} samples ({:.1} s) to {}",
        buffer.len(),
        buffer.duration_secs(),
        output.display()
    );

    Ok(())
}

fn decode_file(input: &Path, config: &Config) -> Result<String> {
    let is_wav = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);
    if !is_wav {
        bail!("Please supply a WAV file: {}", input.display());
    }

    let buffer = load_wav(input)?;
    eprintln!(
        "Decoding {} samples at {} Hz...",
        buffer.len(),
        buffer.sample_rate
    );

    Ok(decode_audio_to_text_with(config, &buffer)?)
}
