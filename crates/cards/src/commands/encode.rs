//! `encode` command implementation.

use std::path::PathBuf;

use card_codec::StructuredDocument;
use clap::Args;

use super::read_file;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the encode command.
#[derive(Args)]
pub(crate) struct EncodeArgs {
    /// Structured document JSON file.
    document: PathBuf,
}

impl EncodeArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let document = parse_document(&read_file(&self.document)?)?;
        Output::new().result(&card_codec::encode(&document));
        Ok(())
    }
}

/// Missing fields take the document defaults.
fn parse_document(json: &str) -> Result<StructuredDocument, CliError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_partial_document() {
        let document = parse_document(r#"{"text": "Hello"}"#).unwrap();
        assert_eq!(document.text, "Hello");
        assert_eq!(document.font, card_codec::DEFAULT_FONT);
    }

    #[test]
    fn test_parse_invalid_document() {
        let err = parse_document("{not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid document JSON"));
    }
}
