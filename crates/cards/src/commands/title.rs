//! `title` command implementation.

use std::path::PathBuf;

use card_config::{CliSettings, Config};
use card_session::{EditorSession, SessionConfig};
use clap::Args;

use super::{VariableArgs, export_preview, read_file};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the title command.
#[derive(Args)]
pub(crate) struct TitleArgs {
    /// Page to look up.
    url: String,

    /// Render this template with the title bound and export it.
    #[arg(short, long)]
    template: Option<PathBuf>,

    #[command(flatten)]
    variables: VariableArgs,

    /// Output directory for the exported image.
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl TitleArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.out,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markup = match &self.template {
            Some(path) => read_file(path)?,
            None => String::new(),
        };
        let mut session = EditorSession::new(
            SessionConfig::from_config(&config)?
                .with_markup(markup)
                .with_variables(self.variables.load()?),
        );

        let result = session
            .lookup_title(&self.url)
            .map_err(CliError::from)
            .and_then(|title| {
                output.result(&title);
                if self.template.is_some() {
                    export_preview(&session, &output)?;
                }
                Ok(())
            });
        session.close();
        result
    }
}
