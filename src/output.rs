
use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::error::CliError;
use crate::i18n::{Label, Messages};
use crate::types::{AudioQuery, Preset, Speaker, SupportedDevices, SynthesisResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

/// Resolves the output mode from the two flags. `--type` and `--json` are
/// mutually exclusive; an explicit `--type` wins when given alone, and the
/// default is text.
pub fn resolve_mode(type_flag: Option<OutputMode>, json: bool) -> Result<OutputMode, CliError> {
    match (type_flag, json) {
        (Some(_), true) => Err(CliError::Validation(
            "--type and --json are mutually exclusive".to_string(),
        )),
        (Some(mode), false) => Ok(mode),
        (None, true) => Ok(OutputMode::Json),
        (None, false) => Ok(OutputMode::Text),
    }
}

/// Full-object pretty JSON (2-space indentation), trailing newline included.
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Pads a label with spaces up to `width` display columns, counting
/// double-width (CJK) characters as two columns.
fn pad_label(label: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(label);
    format!("{label}{}", " ".repeat(width.saturating_sub(current)))
}

fn labeled_lines(fields: &[(&str, String)], indent: &str) -> String {
    let width = fields
        .iter()
        .map(|(label, _)| UnicodeWidthStr::width(*label))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in fields {
        let _ = writeln!(out, "{indent}{}  {value}", pad_label(label, width));
    }
    out
}

/// Tab-separated speaker table, one row per style.
pub fn format_speakers(speakers: &[Speaker]) -> String {
    let mut out = String::from("STYLE_ID\tSPEAKER_NAME\tSTYLE_NAME\n");
    for speaker in speakers {
        for style in &speaker.styles {
            let _ = writeln!(out, "{}\t{}\t{}", style.id, speaker.name, style.name);
        }
    }
    out
}

/// Numbered preset list with labeled sub-fields.
pub fn format_presets(presets: &[Preset], messages: &Messages) -> String {
    let mut out = String::new();
    for (index, preset) in presets.iter().enumerate() {
        let _ = writeln!(out, "{}. {} (id: {})", index + 1, preset.name, preset.id);
        let fields = [
            (messages.label(Label::Speaker), preset.speaker_uuid.clone()),
            (messages.label(Label::Style), preset.style_id.to_string()),
            (messages.label(Label::SpeedScale), preset.speed_scale.to_string()),
            (messages.label(Label::PitchScale), preset.pitch_scale.to_string()),
            (
                messages.label(Label::IntonationScale),
                preset.intonation_scale.to_string(),
            ),
            (messages.label(Label::VolumeScale), preset.volume_scale.to_string()),
            (
                messages.label(Label::PrePhonemeLength),
                preset.pre_phoneme_length.to_string(),
            ),
            (
                messages.label(Label::PostPhonemeLength),
                preset.post_phoneme_length.to_string(),
            ),
        ];
        out.push_str(&labeled_lines(&fields, "  "));
    }
    out
}

/// Field dump of an audio query with width-aligned labels.
pub fn format_audio_query(query: &AudioQuery, messages: &Messages) -> String {
    let fields = [
        (messages.label(Label::SpeedScale), query.speed_scale.to_string()),
        (messages.label(Label::PitchScale), query.pitch_scale.to_string()),
        (
            messages.label(Label::IntonationScale),
            query.intonation_scale.to_string(),
        ),
        (messages.label(Label::VolumeScale), query.volume_scale.to_string()),
        (
            messages.label(Label::PrePhonemeLength),
            query.pre_phoneme_length.to_string(),
        ),
        (
            messages.label(Label::PostPhonemeLength),
            query.post_phoneme_length.to_string(),
        ),
        (
            messages.label(Label::SamplingRate),
            query.output_sampling_rate.to_string(),
        ),
        (messages.label(Label::Stereo), query.output_stereo.to_string()),
        (
            messages.label(Label::Kana),
            query.kana.clone().unwrap_or_else(|| "-".to_string()),
        ),
        (
            messages.label(Label::AccentPhrases),
            query.accent_phrases.len().to_string(),
        ),
    ];
    labeled_lines(&fields, "")
}

pub fn format_devices(devices: &SupportedDevices) -> String {
    fn mark(supported: bool) -> &'static str {
        if supported {
            "supported"
        } else {
            "not supported"
        }
    }
    format!(
        "CPU\t{}\nCUDA\t{}\nDirectML\t{}\n",
        mark(devices.cpu),
        mark(devices.cuda),
        mark(devices.dml)
    )
}

pub fn format_result(result: &SynthesisResult, messages: &Messages) -> String {
    let fields = [
        (
            messages.label(Label::Output),
            result.output.display().to_string(),
        ),
        (messages.label(Label::ByteSize), result.byte_size.to_string()),
        (
            messages.label(Label::Format),
            result.format.extension().to_string(),
        ),
    ];
    labeled_lines(&fields, "")
}
