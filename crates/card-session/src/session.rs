//! The editor session.

use std::path::Path;
use std::sync::Arc;

use card_codec::{DocumentField, decode, encode, image_data_uri};
use card_export::{CaptureError, ExportPipeline, ExportedFile};
use card_remote::{RemoteError, TitleLookup};
use card_render::{
    LiveRenderer, MountDecision, RemountController, RenderError, RenderState, SubtreeHandle,
};
use card_vars::{ChangeOrigin, RenderKey, VariableReceiver, VariableSet, VariableStore};

use crate::config::SessionConfig;
use crate::error::EditError;
use crate::mode::EditMode;

/// One editing session: template, bindings, live preview and export.
///
/// Raw markup is the source of truth. Variable changes from any origin reach
/// the preview through [`sync`](Self::sync); every observed change remounts
/// the preview under a new generation.
pub struct EditorSession {
    markup: String,
    mode: EditMode,
    store: VariableStore,
    events: VariableReceiver,
    renderer: LiveRenderer,
    remount: RemountController,
    pipeline: ExportPipeline,
    title_lookup: TitleLookup,
    title_variable: String,
}

impl EditorSession {
    /// Start a session and render the initial markup.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let store = VariableStore::with_variables(config.variables);
        let events = store.subscribe();
        let mut session = Self {
            markup: config.markup,
            mode: EditMode::Code,
            store,
            events,
            renderer: LiveRenderer::new(),
            remount: RemountController::new(config.viewport),
            pipeline: config.pipeline,
            title_lookup: config.title_lookup,
            title_variable: config.title_variable,
        };
        session.rerender();
        tracing::debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            "Session started"
        );
        session
    }

    /// End the session, detaching the preview.
    pub fn close(mut self) {
        self.remount.unmount();
        tracing::debug!(remounts = self.remount.remount_count(), "Session closed");
    }

    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Replace the raw markup and re-render.
    ///
    /// In structured mode the document is decoded again from the new markup.
    pub fn set_markup(&mut self, markup: impl Into<String>) -> &RenderState {
        self.markup = markup.into();
        if self.mode.is_structured() {
            self.mode = EditMode::Structured(decode(&self.markup));
        }
        self.rerender();
        self.renderer.state()
    }

    /// Current bindings.
    #[must_use]
    pub fn variables(&self) -> Arc<VariableSet> {
        self.store.snapshot()
    }

    /// Shared handle to the bindings, for other change origins.
    #[must_use]
    pub fn store(&self) -> VariableStore {
        self.store.clone()
    }

    /// Replace every binding and refresh the preview.
    pub fn replace_variables(&mut self, vars: VariableSet) -> RenderKey {
        let key = self.store.replace(vars, ChangeOrigin::Manual);
        self.sync();
        key
    }

    /// Set one binding and refresh the preview.
    pub fn upsert_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> RenderKey {
        let key = self.store.upsert(name, value, ChangeOrigin::Manual);
        self.sync();
        key
    }

    /// Apply pending variable changes.
    ///
    /// Pending changes are coalesced into one render of the newest snapshot.
    /// Returns the number of changes observed.
    pub fn sync(&mut self) -> usize {
        let changes = self.events.drain().count();
        if changes > 0 {
            self.rerender();
        }
        changes
    }

    #[must_use]
    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Decode the current markup and switch to field editing.
    pub fn enter_structured_mode(&mut self) -> &EditMode {
        let document = decode(&self.markup);
        tracing::debug!(text_len = document.text.len(), "Entered structured mode");
        self.mode = EditMode::Structured(document);
        &self.mode
    }

    /// Back to raw markup editing; the decoded document is discarded.
    pub fn exit_structured_mode(&mut self) {
        self.mode = EditMode::Code;
    }

    pub fn toggle_mode(&mut self) -> &EditMode {
        if self.mode.is_structured() {
            self.exit_structured_mode();
        } else {
            self.enter_structured_mode();
        }
        &self.mode
    }

    /// Change one field and re-encode the document into the markup.
    pub fn edit_field(
        &mut self,
        field: DocumentField,
        value: impl Into<String>,
    ) -> Result<&RenderState, EditError> {
        let EditMode::Structured(document) = &mut self.mode else {
            return Err(EditError::NotStructured);
        };
        document.set(field, value);
        self.markup = encode(document);
        self.rerender();
        Ok(self.renderer.state())
    }

    /// Load an image file into the `image` field.
    pub fn set_image_file(&mut self, path: &Path) -> Result<&RenderState, EditError> {
        if !self.mode.is_structured() {
            return Err(EditError::NotStructured);
        }
        let uri = image_data_uri(path)?;
        self.edit_field(DocumentField::Image, uri)
    }

    #[must_use]
    pub fn render_state(&self) -> &RenderState {
        self.renderer.state()
    }

    /// Error of the last render, if it failed.
    #[must_use]
    pub fn render_error(&self) -> Option<&RenderError> {
        self.renderer.error()
    }

    /// Handle to the mounted preview.
    #[must_use]
    pub fn preview(&self) -> SubtreeHandle {
        self.remount.handle()
    }

    #[must_use]
    pub fn remount_count(&self) -> u64 {
        self.remount.remount_count()
    }

    /// Capture the preview and deliver it as a file.
    pub fn export(&self) -> Result<ExportedFile, CaptureError> {
        self.pipeline.export(&self.remount.handle())
    }

    /// Look up the title of `url` and bind it to the title variable.
    ///
    /// On failure the bindings are left untouched.
    pub fn lookup_title(&mut self, url: &str) -> Result<String, RemoteError> {
        let title = match self.title_lookup.lookup(url) {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(url, error = %e, "Title lookup failed");
                return Err(e);
            }
        };
        self.store.upsert(
            self.title_variable.as_str(),
            title.as_str(),
            ChangeOrigin::TitleLookup,
        );
        self.sync();
        Ok(title)
    }

    /// Render the markup against the newest bindings and mount the result.
    ///
    /// While errored, the last good tree stays mounted; a new key still
    /// remounts it under the new generation.
    fn rerender(&mut self) {
        let (vars, key) = self.store.snapshot_with_key();
        self.renderer.render(&self.markup, &vars);
        if let Some(tree) = self.renderer.visible_tree() {
            let decision = self.remount.observe(&key, Arc::clone(tree));
            if decision != MountDecision::Unchanged {
                tracing::debug!(?decision, state = self.renderer.state().name(), "Preview refreshed");
            }
        }
    }
}
