//! Settings of the `semilla` commands.
//!
//! `defaults/semilla.default.toml` is compiled in and sets every key, so a `--config` file
//! only lists the keys it changes. Flags such as `--order` or `--site-top` are applied last
//! as overrides of the same keys (see [KEYS]).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;
pub use semilla_posts::{HtmlLayout, OrderBy};

const DEFAULT_TOML: &str = include_str!("../defaults/semilla.default.toml");

/// `[highlight]`, `[cpp]`, `[links]` and `[feed]` of the configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct SemillaConfig {
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub cpp: CppConfig,
    pub links: LinksConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub escape: bool,
    pub wrap_pre: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CppConfig {
    /// Regex identifiers must match; unset keeps the lower camel case default.
    #[serde(default)]
    pub identifier_style: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
    pub site_top: String,
    pub check: bool,
}

/// How `semilla feed` orders, pages and lays out posts.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub order: OrderBy,
    pub page_length: usize,
    pub layout: HtmlLayout,
    pub compact: bool,
}

/// Every key a file or an override may set, as `section.name`.
pub const KEYS: &[&str] = &[
    "highlight.escape",
    "highlight.wrap_pre",
    "cpp.identifier_style",
    "links.site_top",
    "links.check",
    "feed.order",
    "feed.page_length",
    "feed.layout",
    "feed.compact",
];

/// Builds a [SemillaConfig]: embedded defaults, then the `--config` file, then flags.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layers a TOML file given with `--config`. A missing file fails the build.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Sets one of [KEYS] from a command-line flag. Any other key is a
    /// [ConfigError::NotFound].
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        if !KEYS.contains(&key) {
            return Err(ConfigError::NotFound(key.to_string()));
        }
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merges the layers and checks the values no type can express.
    pub fn build(self) -> Result<SemillaConfig, ConfigError> {
        let config: SemillaConfig = self.builder.build()?.try_deserialize()?;
        if config.feed.page_length == 0 {
            return Err(ConfigError::Message(
                "feed.page_length must be at least 1".into(),
            ));
        }
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<SemillaConfig, ConfigError> {
    Loader::new().build()
}
