//! `render` command implementation.

use std::path::PathBuf;

use card_config::{CliSettings, Config, StrategyKind};
use card_session::{EditorSession, SessionConfig};
use clap::Args;

use super::{VariableArgs, export_preview, read_file};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Template markup file.
    template: PathBuf,

    #[command(flatten)]
    variables: VariableArgs,

    /// Output directory for the exported image.
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Capture strategy to try, in order (repeatable).
    #[arg(long = "strategy", value_name = "NAME")]
    strategies: Vec<StrategyKind>,

    /// Preview width in CSS pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Preview height in CSS pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Remote rendering service URL.
    #[arg(long, env = "CARDS_REMOTE_URL")]
    remote_url: Option<String>,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            strategies: self.strategies,
            output_dir: self.out,
            width: self.width,
            height: self.height,
            remote_url: self.remote_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markup = read_file(&self.template)?;
        let vars = self.variables.load()?;
        tracing::info!(
            template = %self.template.display(),
            variables = vars.len(),
            "Rendering template"
        );

        let session = EditorSession::new(
            SessionConfig::from_config(&config)?
                .with_markup(markup)
                .with_variables(vars),
        );
        let result = export_preview(&session, &output);
        session.close();
        result.map(|_| ())
    }
}
