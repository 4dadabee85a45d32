
pub mod client;
pub mod error;
pub mod i18n;
pub mod input;
pub mod output;
pub mod play;
pub mod synth;
pub mod types;

#[cfg(test)]
mod test_server;

pub use client::EngineClient;
pub use error::{classify, report, CliError, ErrorKind};
pub use i18n::{Locale, Messages};
pub use input::{resolve_input, resolve_multi_input, InputArtifact};
