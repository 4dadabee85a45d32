
use crate::error::ErrorKind;

/// User-facing message language. Resolved once at startup and passed into the
/// command handlers; nothing in the library reads the environment on its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    En,
    Ja,
}

impl Locale {
    /// `VOICEVOX_CLI_LANG` wins over `LANG`; anything not recognizably
    /// Japanese falls back to English.
    pub fn from_env() -> Self {
        let value = std::env::var("VOICEVOX_CLI_LANG")
            .or_else(|_| std::env::var("LANG"))
            .ok();
        Self::detect(value.as_deref())
    }

    pub fn detect(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.to_ascii_lowercase().starts_with("ja") => Self::Ja,
            _ => Self::En,
        }
    }
}

/// Localized user-facing strings. Log output stays English; only what is
/// printed to the terminal goes through this table.
#[derive(Debug, Copy, Clone)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn headline(&self, kind: ErrorKind) -> &'static str {
        match (self.locale, kind) {
            (Locale::En, ErrorKind::Network) => "Network error",
            (Locale::En, ErrorKind::Api) => "API error",
            (Locale::En, ErrorKind::Validation) => "Validation error",
            (Locale::En, ErrorKind::Unknown) => "Unexpected error",
            (Locale::Ja, ErrorKind::Network) => "ネットワークエラー",
            (Locale::Ja, ErrorKind::Api) => "APIエラー",
            (Locale::Ja, ErrorKind::Validation) => "入力エラー",
            (Locale::Ja, ErrorKind::Unknown) => "不明なエラー",
        }
    }

    pub fn remediation(&self, kind: ErrorKind) -> Option<&'static str> {
        match (self.locale, kind) {
            (Locale::En, ErrorKind::Network) => {
                Some("Check the network connection and that the VOICEVOX engine is running (default: http://localhost:50021).")
            }
            (Locale::En, ErrorKind::Api) => {
                Some("The engine rejected the request. Check the engine version and the request parameters.")
            }
            (Locale::En, ErrorKind::Validation) => {
                Some("Check the command arguments and the input file contents.")
            }
            (Locale::Ja, ErrorKind::Network) => {
                Some("ネットワーク接続と、VOICEVOXエンジンが起動しているかを確認してください（デフォルト: http://localhost:50021）。")
            }
            (Locale::Ja, ErrorKind::Api) => {
                Some("エンジンがリクエストを拒否しました。エンジンのバージョンとリクエストパラメータを確認してください。")
            }
            (Locale::Ja, ErrorKind::Validation) => {
                Some("コマンド引数と入力ファイルの内容を確認してください。")
            }
            (_, ErrorKind::Unknown) => None,
        }
    }

    pub fn label(&self, label: Label) -> &'static str {
        match (self.locale, label) {
            (Locale::En, Label::SpeedScale) => "Speed scale",
            (Locale::En, Label::PitchScale) => "Pitch scale",
            (Locale::En, Label::IntonationScale) => "Intonation scale",
            (Locale::En, Label::VolumeScale) => "Volume scale",
            (Locale::En, Label::PrePhonemeLength) => "Pre-phoneme length",
            (Locale::En, Label::PostPhonemeLength) => "Post-phoneme length",
            (Locale::En, Label::SamplingRate) => "Sampling rate",
            (Locale::En, Label::Stereo) => "Stereo",
            (Locale::En, Label::Kana) => "Kana",
            (Locale::En, Label::AccentPhrases) => "Accent phrases",
            (Locale::En, Label::Output) => "Output",
            (Locale::En, Label::ByteSize) => "Size",
            (Locale::En, Label::Format) => "Format",
            (Locale::En, Label::Speaker) => "Speaker",
            (Locale::En, Label::Style) => "Style",
            (Locale::Ja, Label::SpeedScale) => "話速",
            (Locale::Ja, Label::PitchScale) => "音高",
            (Locale::Ja, Label::IntonationScale) => "抑揚",
            (Locale::Ja, Label::VolumeScale) => "音量",
            (Locale::Ja, Label::PrePhonemeLength) => "開始無音",
            (Locale::Ja, Label::PostPhonemeLength) => "終了無音",
            (Locale::Ja, Label::SamplingRate) => "サンプリングレート",
            (Locale::Ja, Label::Stereo) => "ステレオ",
            (Locale::Ja, Label::Kana) => "カナ",
            (Locale::Ja, Label::AccentPhrases) => "アクセント句数",
            (Locale::Ja, Label::Output) => "出力先",
            (Locale::Ja, Label::ByteSize) => "サイズ",
            (Locale::Ja, Label::Format) => "形式",
            (Locale::Ja, Label::Speaker) => "話者",
            (Locale::Ja, Label::Style) => "スタイル",
        }
    }
}

/// Keys for the per-field labels used by the text formatter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Label {
    SpeedScale,
    PitchScale,
    IntonationScale,
    VolumeScale,
    PrePhonemeLength,
    PostPhonemeLength,
    SamplingRate,
    Stereo,
    Kana,
    AccentPhrases,
    Output,
    ByteSize,
    Format,
    Speaker,
    Style,
}
