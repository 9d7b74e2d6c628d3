//! Font data for local capture strategies.
//!
//! Fonts come from files and URLs. They are loaded on first use and kept for
//! the life of the bundle once every source has loaded; a failed load is
//! retried on the next capture.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use card_remote::{Agent, fetch_bytes};
use swash::{FontRef, StringId};

use crate::error::CaptureError;

/// Raw data of one font file.
#[derive(Debug, Clone)]
pub struct FontData {
    /// Path or URL the font came from.
    pub source: String,
    pub data: Arc<[u8]>,
}

impl FontData {
    /// Parse the data, rejecting anything that is not a font.
    pub fn new(source: impl Into<String>, data: Vec<u8>) -> Result<Self, CaptureError> {
        let source = source.into();
        if FontRef::from_index(&data, 0).is_none() {
            return Err(CaptureError::Fonts(format!("{source} is not a font file")));
        }
        Ok(Self {
            source,
            data: data.into(),
        })
    }

    /// Swash view of the first face.
    #[must_use]
    pub fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, 0)
    }

    /// Family name of the first face.
    #[must_use]
    pub fn family(&self) -> Option<String> {
        let font = self.font_ref()?;
        let name = font
            .localized_strings()
            .find_by_id(StringId::Family, None)?
            .chars()
            .collect::<String>();
        Some(name)
    }

    /// Weight of the first face (400 regular, 700 bold).
    #[must_use]
    pub fn weight(&self) -> u16 {
        self.font_ref().map_or(400, |font| font.attributes().weight().0)
    }
}

/// Lazily loaded set of fonts shared by capture strategies.
#[derive(Debug, Default)]
pub struct FontBundle {
    files: Vec<PathBuf>,
    urls: Vec<String>,
    agent: Option<Agent>,
    system: bool,
    loaded: Mutex<Option<Arc<[FontData]>>>,
}

impl FontBundle {
    #[must_use]
    pub fn new(files: Vec<PathBuf>, urls: Vec<String>, agent: Option<Agent>, system: bool) -> Self {
        Self {
            files,
            urls,
            agent,
            system,
            loaded: Mutex::new(None),
        }
    }

    /// Bundle with fonts already in memory.
    #[must_use]
    pub fn preloaded(fonts: Vec<FontData>, system: bool) -> Self {
        Self {
            system,
            loaded: Mutex::new(Some(fonts.into())),
            ..Self::default()
        }
    }

    /// Whether system fonts may be used as a fallback.
    #[must_use]
    pub fn system(&self) -> bool {
        self.system
    }

    /// Load every configured font, or return the fonts loaded earlier.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    pub fn load(&self) -> Result<Arc<[FontData]>, CaptureError> {
        let mut loaded = self.loaded.lock().unwrap();
        if let Some(fonts) = loaded.as_ref() {
            return Ok(Arc::clone(fonts));
        }

        let mut fonts = Vec::with_capacity(self.files.len() + self.urls.len());
        for path in &self.files {
            let data = std::fs::read(path).map_err(|e| {
                CaptureError::Fonts(format!("cannot read {}: {e}", path.display()))
            })?;
            fonts.push(FontData::new(path.display().to_string(), data)?);
        }
        if !self.urls.is_empty() {
            let agent = self
                .agent
                .as_ref()
                .ok_or_else(|| CaptureError::Fonts("no HTTP client for font URLs".to_owned()))?;
            for url in &self.urls {
                let data = fetch_bytes(agent, url)
                    .map_err(|e| CaptureError::Fonts(format!("cannot fetch {url}: {e}")))?;
                fonts.push(FontData::new(url.as_str(), data)?);
            }
        }

        tracing::debug!(count = fonts.len(), "Loaded font bundle");
        let fonts: Arc<[FontData]> = fonts.into();
        *loaded = Some(Arc::clone(&fonts));
        Ok(fonts)
    }
}

/// Pick the font best matching `family` and weight.
///
/// Without a family match, the closest weight among all fonts wins.
#[must_use]
pub fn select_font<'a>(fonts: &'a [FontData], family: &str, bold: bool) -> Option<&'a FontData> {
    let wanted: u16 = if bold { 700 } else { 400 };
    let families: Vec<String> = family
        .split(',')
        .map(|f| f.trim().to_ascii_lowercase())
        .collect();
    let by_family = fonts.iter().filter(|font| {
        font.family()
            .is_some_and(|name| families.contains(&name.to_ascii_lowercase()))
    });
    by_family
        .min_by_key(|font| font.weight().abs_diff(wanted))
        .or_else(|| fonts.iter().min_by_key(|font| font.weight().abs_diff(wanted)))
}
