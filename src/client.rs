
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CliError;
use crate::types::{AudioQuery, Preset, Speaker, SupportedDevices};

/// Marker for payloads the response validator can check for emptiness.
/// Structured payloads are never "empty"; strings, byte buffers and raw JSON
/// values can be.
pub trait Payload {
    fn is_empty_payload(&self) -> bool {
        false
    }
}

impl Payload for String {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for Vec<u8> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for Value {
    fn is_empty_payload(&self) -> bool {
        self.is_null()
    }
}

impl Payload for AudioQuery {}
impl Payload for bool {}

/// Asserts that a response actually carried a payload.
///
/// Returns the payload unchanged when present and non-empty; otherwise an
/// API-kinded error carrying `message`. This function knows nothing about
/// HTTP status codes — endpoints whose success signal is 204 No Content are
/// special-cased by their callers before this is ever reached.
pub fn validate_payload<T: Payload>(data: Option<T>, message: &str) -> Result<T, CliError> {
    match data {
        Some(value) if !value.is_empty_payload() => Ok(value),
        _ => Err(CliError::Api(message.to_string())),
    }
}

/// Thin typed wrapper over the VOICEVOX engine REST API.
///
/// Every method is one request/response exchange; nothing is retried or
/// cached here. Binary endpoints are fetched in raw-bytes mode, everything
/// else as JSON.
#[derive(Debug, Clone)]
pub struct EngineClient {
    http: Client,
    base: Url,
}

impl EngineClient {
    pub fn new(base_url: &str) -> Result<Self, CliError> {
        let base = Url::parse(base_url)
            .map_err(|e| CliError::Validation(format!("invalid base URL `{base_url}`: {e}")))?;
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base.join(path)?)
    }

    async fn send(&self, request: RequestBuilder) -> anyhow::Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CliError::Api(format!("engine returned {status}: {body}")).into());
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> anyhow::Result<T> {
        let response = self.send(request).await?;
        let value: Value = response.json().await?;
        let value = validate_payload(Some(value), &format!("engine returned no {what}"))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Raw-bytes fetch for the binary (WAV / zip) endpoints.
    async fn fetch_bytes(&self, request: RequestBuilder) -> anyhow::Result<Vec<u8>> {
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn audio_query(&self, text: &str, speaker: u32) -> anyhow::Result<AudioQuery> {
        let url = self.endpoint("audio_query")?;
        log::debug!("POST {url} (speaker={speaker})");
        let speaker = speaker.to_string();
        let request = self
            .http
            .post(url)
            .query(&[("text", text), ("speaker", speaker.as_str())]);
        self.fetch_json(request, "audio query").await
    }

    pub async fn audio_query_from_preset(
        &self,
        text: &str,
        preset_id: u32,
    ) -> anyhow::Result<AudioQuery> {
        let url = self.endpoint("audio_query_from_preset")?;
        log::debug!("POST {url} (preset_id={preset_id})");
        let preset_id = preset_id.to_string();
        let request = self
            .http
            .post(url)
            .query(&[("text", text), ("preset_id", preset_id.as_str())]);
        self.fetch_json(request, "audio query").await
    }

    pub async fn synthesis(&self, speaker: u32, query: &AudioQuery) -> anyhow::Result<Vec<u8>> {
        let url = self.endpoint("synthesis")?;
        log::debug!("POST {url} (speaker={speaker})");
        let request = self
            .http
            .post(url)
            .query(&[("speaker", speaker)])
            .json(query);
        self.fetch_bytes(request).await
    }

    pub async fn multi_synthesis(
        &self,
        speaker: u32,
        queries: &[AudioQuery],
    ) -> anyhow::Result<Vec<u8>> {
        let url = self.endpoint("multi_synthesis")?;
        log::debug!("POST {url} (speaker={speaker}, {} queries)", queries.len());
        let request = self
            .http
            .post(url)
            .query(&[("speaker", speaker)])
            .json(queries);
        self.fetch_bytes(request).await
    }

    pub async fn speakers(&self) -> anyhow::Result<Vec<Speaker>> {
        let url = self.endpoint("speakers")?;
        log::debug!("GET {url}");
        self.fetch_json(self.http.get(url), "speaker list").await
    }

    pub async fn presets(&self) -> anyhow::Result<Vec<Preset>> {
        let url = self.endpoint("presets")?;
        log::debug!("GET {url}");
        self.fetch_json(self.http.get(url), "preset list").await
    }

    pub async fn supported_devices(&self) -> anyhow::Result<SupportedDevices> {
        let url = self.endpoint("supported_devices")?;
        log::debug!("GET {url}");
        self.fetch_json(self.http.get(url), "device report").await
    }

    pub async fn engine_manifest(&self) -> anyhow::Result<Value> {
        let url = self.endpoint("engine_manifest")?;
        log::debug!("GET {url}");
        self.fetch_json(self.http.get(url), "engine manifest").await
    }

    pub async fn version(&self) -> anyhow::Result<String> {
        let url = self.endpoint("version")?;
        log::debug!("GET {url}");
        let version: String = self.fetch_json(self.http.get(url), "engine version").await?;
        Ok(validate_payload(Some(version), "engine returned an empty version")?)
    }

    pub async fn core_versions(&self) -> anyhow::Result<Vec<String>> {
        let url = self.endpoint("core_versions")?;
        log::debug!("GET {url}");
        self.fetch_json(self.http.get(url), "core versions").await
    }

    /// The engine answers 400 when the text is not parseable kana; that is a
    /// verdict about the input, not a failure, so it comes back as `false`.
    pub async fn validate_kana(&self, text: &str) -> anyhow::Result<bool> {
        let url = self.endpoint("validate_kana")?;
        log::debug!("POST {url}");
        let response = self.http.post(url).query(&[("text", text)]).send().await?;
        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Ok(false);
        }
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CliError::Api(format!("engine returned {status}: {body}")).into());
        }
        Ok(response.json().await?)
    }

    /// Pass-through read of the engine's setting page.
    pub async fn setting(&self) -> anyhow::Result<String> {
        let url = self.endpoint("setting")?;
        log::debug!("GET {url}");
        let response = self.send(self.http.get(url)).await?;
        let body = response.text().await?;
        Ok(validate_payload(Some(body), "engine returned an empty setting page")?)
    }

    /// Updates the engine settings. Success is 204 No Content, so there is no
    /// payload to validate here.
    pub async fn update_setting(
        &self,
        cors_policy_mode: &str,
        allow_origin: Option<&str>,
    ) -> anyhow::Result<()> {
        let url = self.endpoint("setting")?;
        log::debug!("POST {url} (cors_policy_mode={cors_policy_mode})");
        let mut form = vec![("cors_policy_mode", cors_policy_mode.to_string())];
        if let Some(origin) = allow_origin {
            form.push(("allow_origin", origin.to_string()));
        }
        self.send(self.http.post(url).form(&form)).await?;
        Ok(())
    }
}
