//! Session construction parameters.

use card_config::Config;
use card_export::{CaptureError, ExportPipeline};
use card_remote::{TitleLookup, create_agent};
use card_render::Viewport;
use card_vars::VariableSet;

/// Everything an [`EditorSession`](crate::EditorSession) is created from.
pub struct SessionConfig {
    /// Size of the rendered preview.
    pub viewport: Viewport,
    /// Initial template markup.
    pub markup: String,
    /// Initial variable bindings.
    pub variables: VariableSet,
    pub pipeline: ExportPipeline,
    pub title_lookup: TitleLookup,
    /// Variable receiving looked-up titles.
    pub title_variable: String,
}

impl SessionConfig {
    #[must_use]
    pub fn new(viewport: Viewport, pipeline: ExportPipeline, title_lookup: TitleLookup) -> Self {
        Self {
            viewport,
            markup: String::new(),
            variables: VariableSet::new(),
            pipeline,
            title_lookup,
            title_variable: "title".to_owned(),
        }
    }

    /// Build the pipeline and title lookup described by `config`.
    ///
    /// Both share one HTTP agent with the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self, CaptureError> {
        let agent = create_agent(config.http.timeout());
        let pipeline = ExportPipeline::from_config(config, &agent)?;
        let title_lookup = match &config.title_lookup.endpoint {
            Some(endpoint) => TitleLookup::via_endpoint(agent, endpoint.clone()),
            None => TitleLookup::direct(agent),
        };

        let mut session = Self::new(
            Viewport::new(config.preview.width, config.preview.height),
            pipeline,
            title_lookup,
        );
        session.title_variable.clone_from(&config.title_lookup.variable);
        Ok(session)
    }

    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    #[must_use]
    pub fn with_variables(mut self, variables: VariableSet) -> Self {
        self.variables = variables;
        self
    }
}
