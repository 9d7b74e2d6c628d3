//! `decode` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::read_file;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the decode command.
#[derive(Args)]
pub(crate) struct DecodeArgs {
    /// Template markup file.
    template: PathBuf,
}

impl DecodeArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markup = read_file(&self.template)?;
        let document = card_codec::decode(&markup);
        Output::new().result(&serde_json::to_string_pretty(&document)?);
        Ok(())
    }
}
