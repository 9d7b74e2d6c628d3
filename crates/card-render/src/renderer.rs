//! Live renderer state machine.

use std::sync::Arc;

use card_vars::VariableSet;

use crate::error::RenderError;
use crate::parser::parse_markup;
use crate::template::interpolate;
use crate::tree::VisualTree;

/// Renderer state.
///
/// `Idle → Rendering → { Rendered | Errored }`. Every edit re-enters
/// `Rendering`; an `Errored` renderer stays errored until the next edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Rendering,
    Rendered(Arc<VisualTree>),
    Errored(RenderError),
}

impl RenderState {
    /// Short state name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Rendering => "rendering",
            Self::Rendered(_) => "rendered",
            Self::Errored(_) => "errored",
        }
    }
}

/// Evaluates templates into visual trees without ever failing the host.
#[derive(Debug)]
pub struct LiveRenderer {
    state: RenderState,
    last_good: Option<Arc<VisualTree>>,
}

impl Default for LiveRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RenderState::Idle,
            last_good: None,
        }
    }

    /// Render markup with the given bindings.
    ///
    /// On error the previous tree stays available through
    /// [`last_good`](Self::last_good).
    pub fn render(&mut self, markup: &str, vars: &VariableSet) -> &RenderState {
        self.state = RenderState::Rendering;

        self.state = match interpolate(markup, vars).and_then(|text| parse_markup(&text)) {
            Ok(tree) => {
                let tree = Arc::new(tree);
                self.last_good = Some(Arc::clone(&tree));
                tracing::debug!("Template rendered");
                RenderState::Rendered(tree)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Template failed to render");
                RenderState::Errored(e)
            }
        };
        &self.state
    }

    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Most recent successfully rendered tree.
    #[must_use]
    pub fn last_good(&self) -> Option<&Arc<VisualTree>> {
        self.last_good.as_ref()
    }

    /// Current error, if the last render failed.
    #[must_use]
    pub fn error(&self) -> Option<&RenderError> {
        match &self.state {
            RenderState::Errored(e) => Some(e),
            _ => None,
        }
    }

    /// Tree to display: the current one, or the last good one while errored.
    #[must_use]
    pub fn visible_tree(&self) -> Option<&Arc<VisualTree>> {
        match &self.state {
            RenderState::Rendered(tree) => Some(tree),
            RenderState::Errored(_) => self.last_good.as_ref(),
            RenderState::Idle | RenderState::Rendering => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_starts_idle() {
        let renderer = LiveRenderer::new();
        assert_eq!(renderer.state(), &RenderState::Idle);
        assert!(renderer.last_good().is_none());
        assert!(renderer.visible_tree().is_none());
    }

    #[test]
    fn test_render_binds_variables() {
        let mut renderer = LiveRenderer::new();
        let vars = VariableSet::from_pairs([("title", "Example")]);

        let state = renderer.render("<h1>{{ title }}</h1>", &vars);
        let RenderState::Rendered(tree) = state else {
            panic!("expected rendered, got {state:?}");
        };
        assert_eq!(tree.root.text_content(), "Example");
    }

    #[test]
    fn test_error_keeps_last_good_then_recovers() {
        let mut renderer = LiveRenderer::new();
        let vars = VariableSet::new();

        renderer.render("<p>good</p>", &vars);
        let good = Arc::clone(renderer.last_good().unwrap());

        let state = renderer.render("<p>bad", &vars);
        assert!(matches!(state, RenderState::Errored(RenderError::Markup { .. })));
        assert!(renderer.error().is_some());
        assert_eq!(renderer.last_good(), Some(&good));
        assert_eq!(renderer.visible_tree(), Some(&good));

        renderer.render("<p>fixed</p>", &vars);
        assert_eq!(renderer.state().name(), "rendered");
        assert!(renderer.error().is_none());
        assert_eq!(renderer.last_good().unwrap().root.text_content(), "fixed");
    }

    #[test]
    fn test_error_without_previous_render() {
        let mut renderer = LiveRenderer::new();
        renderer.render("", &VariableSet::new());
        assert_eq!(renderer.error(), Some(&RenderError::Empty));
        assert!(renderer.visible_tree().is_none());
    }

    #[test]
    fn test_template_error_reported() {
        let mut renderer = LiveRenderer::new();
        renderer.render("<p>{{ title</p>", &VariableSet::new());
        assert!(matches!(renderer.error(), Some(RenderError::Template { .. })));
    }
}
