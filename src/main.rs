
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use voicevox_cli::output::{self, OutputMode};
use voicevox_cli::types::AudioFormat;
use voicevox_cli::{play, synth};
use voicevox_cli::{resolve_input, resolve_multi_input};
use voicevox_cli::{CliError, EngineClient, Locale, Messages};

#[derive(Debug, Parser)]
#[command(name = "voicevox", about = "Command-line client for the VOICEVOX engine", version)]
struct Cli {
    /// Engine base URL
    #[arg(long, global = true, default_value = "http://localhost:50021")]
    base_url: String,

    /// JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Output format (mutually exclusive with --json)
    #[arg(long, global = true, value_enum)]
    r#type: Option<OutputMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize speech from text and play it
    #[command(arg_required_else_help = true)]
    Speak {
        /// Text to speak
        text: String,

        /// Style ID to synthesize with
        #[arg(long, default_value = "1")]
        speaker: u32,

        /// Generate the query from a server-stored preset
        #[arg(long)]
        preset: Option<u32>,

        /// Keep the synthesized audio at this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Synthesize speech to a file
    #[command(arg_required_else_help = true)]
    Synthesis {
        /// Text to synthesize (omit when --input is given)
        text: Option<String>,

        /// Style ID to synthesize with
        #[arg(long, default_value = "1")]
        speaker: u32,

        /// Generate the query from a server-stored preset
        #[arg(long)]
        preset: Option<u32>,

        /// Input file: audio query JSON, audio query array, or one text per line
        #[arg(long)]
        input: Option<PathBuf>,

        /// Batch mode: --input must hold a JSON array of audio queries
        #[arg(long)]
        multi: bool,

        /// Output path (default: audio.wav, or audio.zip in batch mode)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Play the result after writing it
        #[arg(long)]
        play: bool,
    },

    /// Generate an audio query from text
    #[command(arg_required_else_help = true)]
    Query {
        /// Text to build the query from
        text: String,

        /// Style ID the query is generated for
        #[arg(long, default_value = "1")]
        speaker: u32,

        /// Generate the query from a server-stored preset
        #[arg(long)]
        preset: Option<u32>,

        /// Require the text to be AquesTalk-style kana
        #[arg(long)]
        kana: bool,

        /// Save the query as JSON instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List speakers and styles
    Speakers,

    /// List presets
    Presets,

    /// Show which devices the engine supports
    Devices,

    /// Read the engine settings, or update them when flags are given
    Setting {
        /// CORS policy mode (all | localapps)
        #[arg(long)]
        cors_policy_mode: Option<String>,

        /// Additional allowed origin
        #[arg(long)]
        allow_origin: Option<String>,
    },

    /// Show the engine manifest and version
    Engine,

    /// Show the core versions the engine bundles
    Core,
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Speak { .. } => "speak",
        Command::Synthesis { .. } => "synthesis",
        Command::Query { .. } => "query",
        Command::Speakers => "speakers",
        Command::Presets => "presets",
        Command::Devices => "devices",
        Command::Setting { .. } => "setting",
        Command::Engine => "engine",
        Command::Core => "core",
    }
}

fn emit<T: Serialize>(value: &T, text: String, mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => print!("{}", output::to_json(value)?),
        OutputMode::Text => print!("{text}"),
    }
    Ok(())
}

fn default_output(artifact: &voicevox_cli::InputArtifact) -> PathBuf {
    use voicevox_cli::InputArtifact::*;
    match artifact {
        Multi(_) | TextMulti(_) => PathBuf::from("audio.zip"),
        Single(_) | TextSingle(_) => PathBuf::from("audio.wav"),
    }
}

async fn run(args: Cli, messages: &Messages) -> anyhow::Result<()> {
    let mode = output::resolve_mode(args.r#type, args.json)?;
    let client = EngineClient::new(&args.base_url)?;
    log::debug!("engine base URL: {}", client.base_url());

    match args.command {
        Command::Speak {
            text,
            speaker,
            preset,
            output: output_path,
        } => {
            let query = synth::build_query(&client, &text, speaker, preset).await?;

            // The scratch dir must outlive playback when no --output was given.
            let mut _scratch = None;
            let out_path = match output_path {
                Some(path) => path,
                None => {
                    let dir = tempfile::tempdir()?;
                    let path = dir.path().join("audio.wav");
                    _scratch = Some(dir);
                    path
                }
            };

            let result = synth::synthesize_one(&client, speaker, &query, &out_path).await?;
            play::play_file(&result.output).await?;
            emit(&result, output::format_result(&result, messages), mode)?;
        }

        Command::Synthesis {
            text,
            speaker,
            preset,
            input,
            multi,
            output: output_path,
            play: play_after,
        } => {
            let result = if let Some(input_path) = input {
                if multi {
                    let queries = resolve_multi_input(&input_path)?;
                    let out = output_path.unwrap_or_else(|| PathBuf::from("audio.zip"));
                    synth::synthesize_many(&client, speaker, &queries, &out).await?
                } else {
                    let artifact = resolve_input(&input_path)?;
                    let out = output_path.unwrap_or_else(|| default_output(&artifact));
                    synth::synthesize_input(&client, speaker, artifact, &out).await?
                }
            } else {
                let text = text.ok_or_else(|| {
                    CliError::Validation("text or --input is required".to_string())
                })?;
                let query = synth::build_query(&client, &text, speaker, preset).await?;
                let out = output_path.unwrap_or_else(|| PathBuf::from("audio.wav"));
                synth::synthesize_one(&client, speaker, &query, &out).await?
            };

            if play_after {
                match result.format {
                    AudioFormat::Wav => play::play_file(&result.output).await?,
                    AudioFormat::Zip => play::play_archive(&result.output).await?,
                }
            }
            emit(&result, output::format_result(&result, messages), mode)?;
        }

        Command::Query {
            text,
            speaker,
            preset,
            kana,
            output: output_path,
        } => {
            if kana {
                let accepted = client.validate_kana(&text).await?;
                if !accepted {
                    return Err(CliError::Validation(
                        "text is not valid AquesTalk-style kana".to_string(),
                    )
                    .into());
                }
            }

            let query = synth::build_query(&client, &text, speaker, preset).await?;
            match output_path {
                Some(path) => {
                    std::fs::write(&path, output::to_json(&query)?)?;
                    log::info!("Wrote audio query to {}", path.display());
                }
                None => emit(&query, output::format_audio_query(&query, messages), mode)?,
            }
        }

        Command::Speakers => {
            let speakers = client.speakers().await?;
            emit(&speakers, output::format_speakers(&speakers), mode)?;
        }

        Command::Presets => {
            let presets = client.presets().await?;
            emit(&presets, output::format_presets(&presets, messages), mode)?;
        }

        Command::Devices => {
            let devices = client.supported_devices().await?;
            emit(&devices, output::format_devices(&devices), mode)?;
        }

        Command::Setting {
            cors_policy_mode,
            allow_origin,
        } => match cors_policy_mode {
            Some(policy) => {
                client
                    .update_setting(&policy, allow_origin.as_deref())
                    .await?;
                log::info!("Engine settings updated");
            }
            None if allow_origin.is_some() => {
                return Err(CliError::Validation(
                    "--allow-origin requires --cors-policy-mode".to_string(),
                )
                .into());
            }
            None => {
                let body = client.setting().await?;
                print!("{body}");
            }
        },

        Command::Engine => {
            let manifest = client.engine_manifest().await?;
            let version = client.version().await?;
            let name = manifest
                .get("name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("VOICEVOX Engine");
            let combined = serde_json::json!({ "version": version, "manifest": manifest });
            emit(&combined, format!("{name}\t{version}\n"), mode)?;
        }

        Command::Core => {
            let versions = client.core_versions().await?;
            let mut text = String::new();
            for version in &versions {
                text.push_str(version);
                text.push('\n');
            }
            emit(&versions, text, mode)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let messages = Messages::new(Locale::from_env());
    let command = command_name(&args.command);

    if let Err(err) = run(args, &messages).await {
        voicevox_cli::report(&err, command, &messages);
    }
}
