//! CLI command implementations.

mod decode;
mod encode;
mod render;
mod title;

use std::path::{Path, PathBuf};

use card_export::ExportedFile;
use card_session::EditorSession;
use card_vars::VariableSet;
use clap::Args;

pub(crate) use decode::DecodeArgs;
pub(crate) use encode::EncodeArgs;
pub(crate) use render::RenderArgs;
pub(crate) use title::TitleArgs;

use crate::error::CliError;
use crate::output::Output;

/// Variable bindings shared by commands that render a template.
#[derive(Args, Debug, Default)]
pub(crate) struct VariableArgs {
    /// JSON file with variable bindings.
    #[arg(long = "vars", value_name = "FILE")]
    pub(crate) vars_file: Option<PathBuf>,

    /// Bind a single variable (repeatable, overrides --vars).
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub(crate) assignments: Vec<String>,
}

impl VariableArgs {
    /// Merge the JSON file and inline assignments into one set.
    pub(crate) fn load(&self) -> Result<VariableSet, CliError> {
        let mut vars = match &self.vars_file {
            Some(path) => VariableSet::from_json(&read_file(path)?)?,
            None => VariableSet::new(),
        };
        for assignment in &self.assignments {
            let (key, value) = VariableSet::parse_assignment(assignment)?;
            vars.insert(key, value);
        }
        Ok(vars)
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Export the session preview, failing first when the template did not render.
pub(crate) fn export_preview(
    session: &EditorSession,
    output: &Output,
) -> Result<ExportedFile, CliError> {
    if let Some(err) = session.render_error() {
        return Err(err.clone().into());
    }
    let file = session.export()?;
    let location = file
        .path
        .as_ref()
        .map_or_else(|| file.filename.clone(), |p| p.display().to_string());
    output.success(&format!(
        "Exported {location} ({}x{}, {} capture)",
        file.width, file.height, file.strategy
    ));
    Ok(file)
}
