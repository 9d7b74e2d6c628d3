//! Configuration management for the card editor.
//!
//! Parses `card.toml` with serde and discovers the file in the current
//! directory or its parents. CLI settings are applied after loading via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! These string values support `${VAR}` (error if unset) and
//! `${VAR:-default}`:
//!
//! - `remote_render.url`
//! - `title_lookup.endpoint`
//! - each entry of `fonts.urls`

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "card.toml";

/// Largest accepted export scale factor.
const MAX_SCALE: f32 = 4.0;

/// Largest capture, in device pixels, that an export may allocate.
pub const MAX_EXPORT_PIXELS: u64 = 64 * 1024 * 1024;

/// CLI settings that override configuration file values.
///
/// Only `Some` values (and non-empty lists) override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the ordered capture strategy list.
    pub strategies: Vec<StrategyKind>,
    /// Override the export output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the preview width.
    pub width: Option<u32>,
    /// Override the preview height.
    pub height: Option<u32>,
    /// Override the remote rendering service URL.
    pub remote_url: Option<String>,
}

/// One capture backend of the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Vector document rasterized locally.
    Vector,
    /// Display list painted straight onto a pixel buffer.
    Snapshot,
    /// External HTML-to-PNG service.
    Remote,
}

impl StrategyKind {
    /// Every strategy, in the default fallback order.
    pub const ALL: [Self; 3] = [Self::Vector, Self::Snapshot, Self::Remote];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Snapshot => "snapshot",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "unknown export strategy '{s}' (expected vector, snapshot or remote)"
                ))
            })
    }
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preview viewport.
    pub preview: PreviewConfig,
    /// Export configuration (paths are relative strings from TOML).
    export: ExportConfigRaw,
    /// Font sources (paths are relative strings from TOML).
    fonts: FontsConfigRaw,
    /// Remote rendering service (optional section).
    /// When present, `url` is required.
    pub remote_render: Option<RemoteRenderConfig>,
    /// Title lookup configuration.
    pub title_lookup: TitleLookupConfig,
    /// HTTP client configuration.
    pub http: HttpConfig,

    /// Resolved export configuration (set after loading).
    #[serde(skip)]
    pub export_resolved: ExportConfig,
    /// Resolved font configuration (set after loading).
    #[serde(skip)]
    pub fonts_resolved: FontsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Preview viewport size in CSS pixels.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ExportConfigRaw {
    strategies: Option<Vec<StrategyKind>>,
    output_dir: Option<String>,
    filename: Option<String>,
    scale: Option<f32>,
}

/// Resolved export configuration with an absolute output directory.
#[derive(Debug)]
pub struct ExportConfig {
    /// Capture strategies, tried in order.
    pub strategies: Vec<StrategyKind>,
    /// Directory receiving exported files.
    pub output_dir: PathBuf,
    /// Exported file name.
    pub filename: String,
    /// Device pixel ratio applied to the viewport.
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            strategies: vec![StrategyKind::Vector],
            output_dir: PathBuf::from("."),
            filename: "preview.png".to_owned(),
            scale: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FontsConfigRaw {
    files: Vec<String>,
    urls: Vec<String>,
    system: Option<bool>,
}

/// Resolved font sources.
#[derive(Debug)]
pub struct FontsConfig {
    /// Font files, absolute.
    pub files: Vec<PathBuf>,
    /// Font URLs fetched at capture time.
    pub urls: Vec<String>,
    /// Whether system fonts are available to vector capture.
    pub system: bool,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            urls: Vec::new(),
            system: true,
        }
    }
}

/// Remote rendering service.
#[derive(Debug, Deserialize)]
pub struct RemoteRenderConfig {
    /// Service URL receiving `POST` render requests.
    pub url: String,
    /// Extra stylesheet text sent with every request.
    #[serde(default)]
    pub css: String,
}

/// Title lookup configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TitleLookupConfig {
    /// Title endpoint; when unset the target page is fetched directly.
    pub endpoint: Option<String>,
    /// Variable receiving the looked-up title.
    pub variable: String,
}

impl Default for TitleLookupConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            variable: "title".to_owned(),
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`remote_render.url`").
        field: String,
        /// Error message (e.g., "${`RENDER_URL`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `card.toml` in the current directory and parents, falling back to
    /// defaults. CLI settings take precedence and are validated with the rest.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if !settings.strategies.is_empty() {
            self.export_resolved.strategies.clone_from(&settings.strategies);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.export_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(width) = settings.width {
            self.preview.width = width;
        }
        if let Some(height) = settings.height {
            self.preview.height = height;
        }
        if let Some(url) = &settings.remote_url {
            match &mut self.remote_render {
                Some(remote) => remote.url.clone_from(url),
                None => {
                    self.remote_render = Some(RemoteRenderConfig {
                        url: url.clone(),
                        css: String::new(),
                    });
                }
            }
        }
    }

    /// Get validated remote rendering configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_remote_render(&self) -> Result<&RemoteRenderConfig, ConfigError> {
        let remote = self.remote_render.as_ref().ok_or_else(|| {
            ConfigError::Validation("[remote_render] section required in config".into())
        })?;
        require_non_empty(&remote.url, "remote_render.url")?;
        require_http_url(&remote.url, "remote_render.url")?;
        Ok(remote)
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Default config with paths relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            preview: PreviewConfig::default(),
            export: ExportConfigRaw::default(),
            fonts: FontsConfigRaw::default(),
            remote_render: None,
            title_lookup: TitleLookupConfig::default(),
            http: HttpConfig::default(),
            export_resolved: ExportConfig {
                output_dir: base.to_path_buf(),
                ..ExportConfig::default()
            },
            fonts_resolved: FontsConfig::default(),
            config_path: None,
        }
    }

    /// Parse TOML text, resolving relative paths against `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion, or validation fails.
    pub fn from_toml(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(config_dir);
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_preview()?;
        self.validate_export()?;
        self.validate_endpoints()?;
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        require_non_empty(&self.title_lookup.variable, "title_lookup.variable")?;
        Ok(())
    }

    fn validate_preview(&self) -> Result<(), ConfigError> {
        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(ConfigError::Validation(
                "preview.width and preview.height must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_export(&self) -> Result<(), ConfigError> {
        let export = &self.export_resolved;
        if export.strategies.is_empty() {
            return Err(ConfigError::Validation(
                "export.strategies cannot be empty".to_owned(),
            ));
        }
        require_non_empty(&export.filename, "export.filename")?;
        if export.filename.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "export.filename must be a bare file name".to_owned(),
            ));
        }
        if !(export.scale > 0.0 && export.scale <= MAX_SCALE) {
            return Err(ConfigError::Validation(format!(
                "export.scale must be in (0, {MAX_SCALE}]"
            )));
        }
        let scale = f64::from(export.scale);
        let pixels = f64::from(self.preview.width) * scale * f64::from(self.preview.height) * scale;
        if pixels > MAX_EXPORT_PIXELS as f64 {
            return Err(ConfigError::Validation(format!(
                "preview.width x preview.height at export.scale {} exceeds {MAX_EXPORT_PIXELS} pixels",
                export.scale
            )));
        }
        if export.strategies.contains(&StrategyKind::Remote) {
            self.require_remote_render()?;
        }
        Ok(())
    }

    fn validate_endpoints(&self) -> Result<(), ConfigError> {
        if self.remote_render.is_some() {
            self.require_remote_render()?;
        }
        if let Some(endpoint) = &self.title_lookup.endpoint {
            require_http_url(endpoint, "title_lookup.endpoint")?;
        }
        for url in &self.fonts_resolved.urls {
            require_http_url(url, "fonts.urls")?;
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(remote) = &mut self.remote_render {
            remote.url = expand::expand_env(&remote.url, "remote_render.url")?;
        }
        if let Some(endpoint) = &self.title_lookup.endpoint {
            self.title_lookup.endpoint =
                Some(expand::expand_env(endpoint, "title_lookup.endpoint")?);
        }
        for url in &mut self.fonts.urls {
            *url = expand::expand_env(url, "fonts.urls")?;
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = ExportConfig::default();
        self.export_resolved = ExportConfig {
            strategies: self.export.strategies.clone().unwrap_or(defaults.strategies),
            output_dir: config_dir.join(self.export.output_dir.as_deref().unwrap_or(".")),
            filename: self.export.filename.clone().unwrap_or(defaults.filename),
            scale: self.export.scale.unwrap_or(defaults.scale),
        };
        self.fonts_resolved = FontsConfig {
            files: self.fonts.files.iter().map(|f| config_dir.join(f)).collect(),
            urls: self.fonts.urls.clone(),
            system: self.fonts.system.unwrap_or(true),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/work"));
        assert_eq!(config.preview.width, 1200);
        assert_eq!(config.preview.height, 630);
        assert_eq!(config.export_resolved.strategies, vec![StrategyKind::Vector]);
        assert_eq!(config.export_resolved.output_dir, PathBuf::from("/work"));
        assert_eq!(config.export_resolved.filename, "preview.png");
        assert!(config.fonts_resolved.system);
        assert_eq!(config.title_lookup.variable, "title");
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[preview]
width = 800
height = 400

[export]
strategies = ["snapshot", "remote"]
output_dir = "out"
filename = "card.png"
scale = 2.0

[fonts]
files = ["fonts/Roboto-Regular.ttf"]
urls = ["https://cdn.example.com/Inter.ttf"]
system = false

[remote_render]
url = "https://render.example.com/png"
css = "body { margin: 0; }"

[title_lookup]
endpoint = "https://cards.example.com/api/get-title"
variable = "headline"

[http]
timeout_secs = 5
"#;
        let config = Config::from_toml(toml, Path::new("/project")).unwrap();

        assert_eq!(config.preview.width, 800);
        assert_eq!(
            config.export_resolved.strategies,
            vec![StrategyKind::Snapshot, StrategyKind::Remote]
        );
        assert_eq!(config.export_resolved.output_dir, PathBuf::from("/project/out"));
        assert_eq!(config.export_resolved.filename, "card.png");
        assert!((config.export_resolved.scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(
            config.fonts_resolved.files,
            vec![PathBuf::from("/project/fonts/Roboto-Regular.ttf")]
        );
        assert!(!config.fonts_resolved.system);
        let remote = config.require_remote_render().unwrap();
        assert_eq!(remote.css, "body { margin: 0; }");
        assert_eq!(config.title_lookup.variable, "headline");
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_remote_strategy_requires_section() {
        let toml = r#"
[export]
strategies = ["remote"]
"#;
        let err = Config::from_toml(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("[remote_render]"));
    }

    #[test]
    fn test_remote_render_requires_http_url() {
        let toml = r#"
[remote_render]
url = "ftp://render.example.com"
"#;
        let err = Config::from_toml(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("remote_render.url"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let toml = r#"
[export]
strategies = ["canvas"]
"#;
        assert!(matches!(
            Config::from_toml(toml, Path::new("/project")),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_scale_bounds() {
        for scale in ["0.0", "4.5", "-1.0"] {
            let toml = format!("[export]\nscale = {scale}\n");
            let err = Config::from_toml(&toml, Path::new("/p")).unwrap_err();
            assert!(err.to_string().contains("export.scale"), "{scale}: {err}");
        }
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = Config::from_toml("[http]\ntimeout_secs = 0\n", Path::new("/p")).unwrap_err();
        assert!(err.to_string().contains("http.timeout_secs"));

        let err = Config::from_toml("[preview]\nwidth = 0\n", Path::new("/p")).unwrap_err();
        assert!(err.to_string().contains("preview.width"));

        let err = Config::from_toml("[export]\nstrategies = []\n", Path::new("/p")).unwrap_err();
        assert!(err.to_string().contains("export.strategies"));
    }

    #[test]
    fn test_oversized_preview_rejected() {
        let toml = "[preview]\nwidth = 4294967295\nheight = 4294967295\n";
        let err = Config::from_toml(toml, Path::new("/p")).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");

        let err = Config::from_toml(
            "[preview]\nwidth = 8192\nheight = 8192\n\n[export]\nscale = 2.0\n",
            Path::new("/p"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("export.scale 2"), "{err}");

        assert!(Config::from_toml("[preview]\nwidth = 8192\nheight = 8192\n", Path::new("/p")).is_ok());
    }

    #[test]
    fn test_oversized_cli_preview_rejected() {
        let mut config = Config::default_with_base(Path::new("/p"));
        config.apply_cli_settings(&CliSettings {
            width: Some(100_000),
            height: Some(100_000),
            ..CliSettings::default()
        });
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_filename_must_be_bare() {
        let err = Config::from_toml("[export]\nfilename = \"../x.png\"\n", Path::new("/p"))
            .unwrap_err();
        assert!(err.to_string().contains("export.filename"));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CARD_CONFIG_RENDER_URL", "https://render.test");
            std::env::remove_var("CARD_CONFIG_FONT_HOST");
        }

        let toml = r#"
[remote_render]
url = "${CARD_CONFIG_RENDER_URL}/png"

[fonts]
urls = ["${CARD_CONFIG_FONT_HOST:-https://fonts.test}/Roboto.ttf"]
"#;
        let config = Config::from_toml(toml, Path::new("/p")).unwrap();
        assert_eq!(config.require_remote_render().unwrap().url, "https://render.test/png");
        assert_eq!(config.fonts_resolved.urls, vec!["https://fonts.test/Roboto.ttf".to_owned()]);

        unsafe {
            std::env::remove_var("CARD_CONFIG_RENDER_URL");
        }
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CARD_CONFIG_MISSING_ENDPOINT");
        }
        let toml = r#"
[title_lookup]
endpoint = "${CARD_CONFIG_MISSING_ENDPOINT}"
"#;
        let err = Config::from_toml(toml, Path::new("/p")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "title_lookup.endpoint"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.apply_cli_settings(&CliSettings {
            strategies: vec![StrategyKind::Remote, StrategyKind::Vector],
            output_dir: Some(PathBuf::from("/tmp/out")),
            width: Some(600),
            height: None,
            remote_url: Some("http://localhost:9000/render".to_owned()),
        });

        assert_eq!(
            config.export_resolved.strategies,
            vec![StrategyKind::Remote, StrategyKind::Vector]
        );
        assert_eq!(config.export_resolved.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.preview.width, 600);
        assert_eq!(config.preview.height, 630);
        assert_eq!(
            config.require_remote_render().unwrap().url,
            "http://localhost:9000/render"
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.export_resolved.strategies, vec![StrategyKind::Vector]);
        assert!(config.remote_render.is_none());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Snapshot".parse::<StrategyKind>().unwrap(), StrategyKind::Snapshot);
        assert_eq!(StrategyKind::Remote.to_string(), "remote");
        assert!("bitmap".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.toml");
        std::fs::write(&path, "[export]\noutput_dir = \"exports\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.export_resolved.output_dir, dir.path().join("exports"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/card.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            strategies: vec![StrategyKind::Remote],
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(err.to_string().contains("[remote_render]"));
    }
}
