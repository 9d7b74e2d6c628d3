//! Remount control for the rendered preview.
//!
//! The mounted preview is keyed by [`RenderKey`]. A new key discards the
//! mount and everything scoped to it (memoized layout, outstanding
//! [`SubtreeHandle`]s); the same key only swaps the tree in place.

use std::sync::{Arc, Mutex, RwLock, Weak};

use card_vars::RenderKey;

use crate::layout::{DisplayList, Viewport, layout};
use crate::tree::VisualTree;

/// Outcome of [`RemountController::observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountDecision {
    /// New generation: previous mount discarded.
    Remounted,
    /// Same generation, tree replaced in place.
    Updated,
    /// Same generation and same tree.
    Unchanged,
}

/// Generation-scoped state of the mounted preview.
#[derive(Debug)]
pub struct MountedPreview {
    key: RenderKey,
    viewport: Viewport,
    tree: RwLock<Arc<VisualTree>>,
    display_list: Mutex<Option<Arc<DisplayList>>>,
}

impl MountedPreview {
    fn new(key: RenderKey, tree: Arc<VisualTree>, viewport: Viewport) -> Self {
        Self {
            key,
            viewport,
            tree: RwLock::new(tree),
            display_list: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn key(&self) -> &RenderKey {
        &self.key
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current tree.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn tree(&self) -> Arc<VisualTree> {
        Arc::clone(&self.tree.read().unwrap())
    }

    /// Display list of the current tree, computed once per tree.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn display_list(&self) -> Arc<DisplayList> {
        let mut cached = self.display_list.lock().unwrap();
        if let Some(list) = cached.as_ref() {
            return Arc::clone(list);
        }
        let list = Arc::new(layout(&self.tree(), self.viewport));
        *cached = Some(Arc::clone(&list));
        list
    }

    fn replace_tree(&self, tree: Arc<VisualTree>) {
        *self.tree.write().unwrap() = tree;
        *self.display_list.lock().unwrap() = None;
    }
}

/// Weak reference to a mounted preview.
///
/// Stops resolving once its generation is unmounted.
#[derive(Clone, Debug, Default)]
pub struct SubtreeHandle(Weak<MountedPreview>);

impl SubtreeHandle {
    /// A handle that never resolves.
    #[must_use]
    pub fn detached() -> Self {
        Self(Weak::new())
    }

    /// The mounted preview, if still attached.
    #[must_use]
    pub fn resolve(&self) -> Option<Arc<MountedPreview>> {
        self.0.upgrade()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// Decides between remounting and in-place updates of the preview.
#[derive(Debug)]
pub struct RemountController {
    viewport: Viewport,
    mounted: Option<Arc<MountedPreview>>,
    remounts: u64,
}

impl RemountController {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            mounted: None,
            remounts: 0,
        }
    }

    /// Mount `tree` under `key`.
    pub fn observe(&mut self, key: &RenderKey, tree: Arc<VisualTree>) -> MountDecision {
        if let Some(mounted) = &self.mounted
            && mounted.key() == key
        {
            if *mounted.tree() == *tree {
                return MountDecision::Unchanged;
            }
            mounted.replace_tree(tree);
            tracing::debug!(generation = key.generation(), "Preview updated in place");
            return MountDecision::Updated;
        }

        self.mounted = Some(Arc::new(MountedPreview::new(key.clone(), tree, self.viewport)));
        self.remounts += 1;
        tracing::debug!(generation = key.generation(), key = %key, "Preview remounted");
        MountDecision::Remounted
    }

    /// Handle to the current mount (detached when nothing is mounted).
    #[must_use]
    pub fn handle(&self) -> SubtreeHandle {
        self.mounted
            .as_ref()
            .map_or_else(SubtreeHandle::detached, |m| SubtreeHandle(Arc::downgrade(m)))
    }

    #[must_use]
    pub fn mounted(&self) -> Option<&Arc<MountedPreview>> {
        self.mounted.as_ref()
    }

    /// Key of the current mount.
    #[must_use]
    pub fn mounted_key(&self) -> Option<&RenderKey> {
        self.mounted.as_ref().map(|m| m.key())
    }

    /// Tear down the current mount.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            tracing::debug!(generation = mounted.key().generation(), "Preview unmounted");
        }
    }

    /// Number of remounts so far.
    #[must_use]
    pub fn remount_count(&self) -> u64 {
        self.remounts
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
