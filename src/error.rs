
use thiserror::Error;

use crate::i18n::Messages;

/// Closed error taxonomy. Every failure that reaches the user is reported
/// under exactly one of these kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Api,
    Validation,
    Unknown,
}

/// Errors raised by this crate's own components. These carry their kind
/// explicitly, so classification never has to guess for them.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Api(String),
    #[error("{0}")]
    Validation(String),
}

impl CliError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Api(_) => ErrorKind::Api,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Ordered substring rules for foreign errors. Checked first to last; the
/// first category with any matching needle wins, so network vocabulary beats
/// API vocabulary beats validation vocabulary.
const CLASSIFY_RULES: &[(&[&str], ErrorKind)] = &[
    (
        &["fetch", "network", "connection", "timeout"],
        ErrorKind::Network,
    ),
    (&["api", "http", "response"], ErrorKind::Api),
    (
        &["validation", "invalid", "required"],
        ErrorKind::Validation,
    ),
];

/// Buckets an error into the taxonomy.
///
/// A `CliError` anywhere in the chain keeps its own kind regardless of its
/// message text. Everything else is matched case-insensitively against the
/// rendered error chain.
pub fn classify(err: &anyhow::Error) -> ErrorKind {
    for cause in err.chain() {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return cli.kind();
        }
    }

    let message = format!("{err:#}").to_lowercase();
    for (needles, kind) in CLASSIFY_RULES {
        if needles.iter().any(|needle| message.contains(needle)) {
            return *kind;
        }
    }
    ErrorKind::Unknown
}

/// Terminal error reporter. Logs the full diagnostic, prints the localized
/// headline, the raw message and the remediation hint for the kind, then
/// exits with status 1. Never returns.
pub fn report(err: &anyhow::Error, command: &str, messages: &Messages) -> ! {
    let kind = classify(err);
    log::error!("command `{command}` failed ({kind:?}): {err:?}");

    eprintln!("{}", messages.headline(kind));
    eprintln!("  {err:#}");
    if let Some(hint) = messages.remediation(kind) {
        eprintln!("  {hint}");
    }

    std::process::exit(1);
}
