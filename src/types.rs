
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Prosody description returned by the engine's query endpoints.
///
/// The engine serializes the scalar fields in camelCase but keeps the nested
/// phrase list in snake_case. Once obtained, a query is forwarded verbatim to
/// the synthesis endpoints without modification.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AudioQuery {
    #[serde(rename = "accent_phrases")]
    pub accent_phrases: Vec<AccentPhrase>,
    pub speed_scale: f64,
    pub pitch_scale: f64,
    pub intonation_scale: f64,
    pub volume_scale: f64,
    pub pre_phoneme_length: f64,
    pub post_phoneme_length: f64,
    pub output_sampling_rate: i64,
    pub output_stereo: bool,
    pub kana: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccentPhrase {
    pub moras: Vec<Mora>,
    pub accent: i64,
    pub pause_mora: Option<Mora>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_interrogative: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Mora {
    pub text: String,
    pub consonant: Option<String>,
    pub consonant_length: Option<f64>,
    pub vowel: String,
    pub vowel_length: f64,
    pub pitch: f64,
}

/// Voice as listed by GET /speakers. A speaker bundles one or more styles;
/// the style id is what the synthesis endpoints call `speaker`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Speaker {
    pub name: String,
    pub speaker_uuid: String,
    pub styles: Vec<SpeakerStyle>,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpeakerStyle {
    pub name: String,
    pub id: u32,
}

/// Server-stored synthesis parameter bundle from GET /presets.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: u32,
    pub name: String,
    #[serde(rename = "speaker_uuid")]
    pub speaker_uuid: String,
    #[serde(rename = "style_id")]
    pub style_id: u32,
    pub speed_scale: f64,
    pub pitch_scale: f64,
    pub intonation_scale: f64,
    pub volume_scale: f64,
    pub pre_phoneme_length: f64,
    pub post_phoneme_length: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SupportedDevices {
    pub cpu: bool,
    pub cuda: bool,
    #[serde(default)]
    pub dml: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Zip,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Zip => "zip",
        }
    }
}

/// Metadata describing one finished synthesis write. Reported once and
/// discarded; never read back.
#[derive(Serialize, Debug, Clone)]
pub struct SynthesisResult {
    pub output: PathBuf,
    pub byte_size: u64,
    pub format: AudioFormat,
}
