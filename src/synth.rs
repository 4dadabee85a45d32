
use std::fs;
use std::path::Path;

use crate::client::{validate_payload, EngineClient};
use crate::error::CliError;
use crate::input::InputArtifact;
use crate::types::{AudioFormat, AudioQuery, SynthesisResult};

/// Engine-imposed bound on text driving query generation.
pub const MAX_TEXT_CHARS: usize = 1000;

pub fn validate_text(text: &str) -> Result<(), CliError> {
    let chars = text.chars().count();
    if chars == 0 {
        return Err(CliError::Validation("text is required".to_string()));
    }
    if chars > MAX_TEXT_CHARS {
        return Err(CliError::Validation(format!(
            "text is too long: {chars} characters (at most {MAX_TEXT_CHARS})"
        )));
    }
    Ok(())
}

/// Builds an audio query from raw text, from the text endpoint or the preset
/// endpoint depending on whether a preset id was given.
pub async fn build_query(
    client: &EngineClient,
    text: &str,
    speaker: u32,
    preset_id: Option<u32>,
) -> anyhow::Result<AudioQuery> {
    validate_text(text)?;
    match preset_id {
        Some(id) => client.audio_query_from_preset(text, id).await,
        None => client.audio_query(text, speaker).await,
    }
}

/// One query-generation call per line, strictly sequential and in file
/// order. The first failure aborts the whole batch.
pub async fn queries_from_lines(
    client: &EngineClient,
    lines: &[String],
    speaker: u32,
) -> anyhow::Result<Vec<AudioQuery>> {
    let mut queries = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        log::info!("Generating audio query {}/{}", index + 1, lines.len());
        validate_text(line)?;
        queries.push(client.audio_query(line, speaker).await?);
    }
    Ok(queries)
}

fn write_output(output: &Path, bytes: &[u8], format: AudioFormat) -> anyhow::Result<SynthesisResult> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, bytes)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), output.display());

    Ok(SynthesisResult {
        output: output.to_path_buf(),
        byte_size: bytes.len() as u64,
        format,
    })
}

/// Single synthesis: one HTTP call, the response written verbatim as a WAV
/// file. No retries; failures propagate raw for classification upstream.
pub async fn synthesize_one(
    client: &EngineClient,
    speaker: u32,
    query: &AudioQuery,
    output: &Path,
) -> anyhow::Result<SynthesisResult> {
    let wav = client.synthesis(speaker, query).await?;
    let wav = validate_payload(Some(wav), "engine returned empty audio")?;
    write_output(output, &wav, AudioFormat::Wav)
}

/// Batch synthesis: one HTTP call carrying the full ordered query sequence,
/// the returned zip archive written verbatim and never inspected here.
pub async fn synthesize_many(
    client: &EngineClient,
    speaker: u32,
    queries: &[AudioQuery],
    output: &Path,
) -> anyhow::Result<SynthesisResult> {
    if queries.is_empty() {
        return Err(CliError::Validation("no audio queries to synthesize".to_string()).into());
    }
    let archive = client.multi_synthesis(speaker, queries).await?;
    let archive = validate_payload(Some(archive), "engine returned an empty archive")?;
    write_output(output, &archive, AudioFormat::Zip)
}

/// Dispatches a resolved input artifact into the single or batch flow.
/// Text shapes are lazily turned into queries first, one call per line.
pub async fn synthesize_input(
    client: &EngineClient,
    speaker: u32,
    artifact: InputArtifact,
    output: &Path,
) -> anyhow::Result<SynthesisResult> {
    match artifact {
        InputArtifact::Single(query) => synthesize_one(client, speaker, &query, output).await,
        InputArtifact::TextSingle(text) => {
            let query = build_query(client, &text, speaker, None).await?;
            synthesize_one(client, speaker, &query, output).await
        }
        InputArtifact::Multi(queries) => {
            synthesize_many(client, speaker, &queries, output).await
        }
        InputArtifact::TextMulti(lines) => {
            let queries = queries_from_lines(client, &lines, speaker).await?;
            synthesize_many(client, speaker, &queries, output).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_server;

    const QUERY_JSON: &str = r#"{
        "accent_phrases": [],
        "speedScale": 1.0,
        "pitchScale": 0.0,
        "intonationScale": 1.0,
        "volumeScale": 1.0,
        "prePhonemeLength": 0.1,
        "postPhonemeLength": 0.1,
        "outputSamplingRate": 24000,
        "outputStereo": false,
        "kana": null
    }"#;
    const WAV_BYTES: &[u8] = b"RIFF-fake-wav-payload";
    const ZIP_BYTES: &[u8] = b"PK-fake-archive-payload";

    fn engine_routes() -> test_server::Routes {
        vec![
            ("/audio_query", 200, QUERY_JSON.as_bytes().to_vec()),
            ("/multi_synthesis", 200, ZIP_BYTES.to_vec()),
            ("/synthesis", 200, WAV_BYTES.to_vec()),
        ]
    }

    fn fixture_query() -> AudioQuery {
        serde_json::from_str(QUERY_JSON).unwrap()
    }

    #[test]
    fn empty_text_is_rejected() {
        let err = validate_text("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn text_length_is_measured_in_characters() {
        // 1000 three-byte characters are fine; 1001 are not.
        let ok = "あ".repeat(MAX_TEXT_CHARS);
        assert!(validate_text(&ok).is_ok());

        let too_long = "あ".repeat(MAX_TEXT_CHARS + 1);
        let err = validate_text(&too_long).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn text_single_generates_one_query_then_one_synthesis_call() {
        let (base, calls) = test_server::spawn(engine_routes()).await;
        let client = EngineClient::new(&base).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.wav");

        let artifact = InputArtifact::TextSingle("hello".to_string());
        let result = synthesize_input(&client, 2, artifact, &out).await.unwrap();

        assert_eq!(result.format, AudioFormat::Wav);
        assert_eq!(result.byte_size, WAV_BYTES.len() as u64);
        assert_eq!(std::fs::read(&out).unwrap(), WAV_BYTES);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["/audio_query?text=hello&speaker=2", "/synthesis?speaker=2"]
        );
    }

    #[tokio::test]
    async fn single_query_issues_one_synthesis_call_and_writes_wav() {
        let (base, calls) = test_server::spawn(engine_routes()).await;
        let client = EngineClient::new(&base).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.wav");

        let artifact = InputArtifact::Single(fixture_query());
        let result = synthesize_input(&client, 2, artifact, &out).await.unwrap();

        assert_eq!(result.format, AudioFormat::Wav);
        assert_eq!(std::fs::read(&out).unwrap(), WAV_BYTES);
        // No query generation for a pre-built query.
        assert_eq!(*calls.lock().unwrap(), vec!["/synthesis?speaker=2"]);
    }

    #[tokio::test]
    async fn text_multi_generates_queries_in_file_order_then_one_batch_call() {
        let (base, calls) = test_server::spawn(engine_routes()).await;
        let client = EngineClient::new(&base).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.zip");

        let lines = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let artifact = InputArtifact::TextMulti(lines);
        let result = synthesize_input(&client, 5, artifact, &out).await.unwrap();

        assert_eq!(result.format, AudioFormat::Zip);
        assert_eq!(std::fs::read(&out).unwrap(), ZIP_BYTES);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "/audio_query?text=one&speaker=5",
                "/audio_query?text=two&speaker=5",
                "/audio_query?text=three&speaker=5",
                "/multi_synthesis?speaker=5",
            ]
        );
    }

    #[tokio::test]
    async fn multi_queries_issue_one_batch_call_and_write_the_archive() {
        let (base, calls) = test_server::spawn(engine_routes()).await;
        let client = EngineClient::new(&base).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.zip");

        let queries = vec![fixture_query(), fixture_query(), fixture_query()];
        let artifact = InputArtifact::Multi(queries);
        let result = synthesize_input(&client, 3, artifact, &out).await.unwrap();

        assert_eq!(result.format, AudioFormat::Zip);
        assert_eq!(result.byte_size, ZIP_BYTES.len() as u64);
        assert_eq!(std::fs::read(&out).unwrap(), ZIP_BYTES);
        assert_eq!(*calls.lock().unwrap(), vec!["/multi_synthesis?speaker=3"]);
    }

    #[tokio::test]
    async fn empty_synthesis_responses_are_rejected() {
        let routes = vec![("/synthesis", 200, Vec::new())];
        let (base, _calls) = test_server::spawn(routes).await;
        let client = EngineClient::new(&base).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.wav");

        let err = synthesize_one(&client, 2, &fixture_query(), &out)
            .await
            .unwrap_err();
        assert_eq!(crate::error::classify(&err), ErrorKind::Api);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn batch_of_zero_queries_never_reaches_the_engine() {
        let (base, calls) = test_server::spawn(engine_routes()).await;
        let client = EngineClient::new(&base).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.zip");

        let err = synthesize_many(&client, 2, &[], &out).await.unwrap_err();
        assert_eq!(crate::error::classify(&err), ErrorKind::Validation);
        assert!(calls.lock().unwrap().is_empty());
    }
}
