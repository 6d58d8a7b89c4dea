//! Cockpit configuration.
//!
//! Loaded from (lowest to highest priority):
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. environment variables (`GEMINI_API_KEY`, `GEMINI_BASE_URL`, ...),
//!    which replace file values
//!
//! ```yaml
//! gemini:
//!   api_key: "${GEMINI_API_KEY}"
//!   text_model: "gemini-2.5-flash"
//!   image_model: "gemini-2.0-flash-exp"
//!   timeout_secs: 300
//!
//! internal_links:
//!   - "https://www.willenskraft.co.at/"
//!   - "https://www.willenskraft.co.at/kontakt-hundeschule/"
//!
//! server:
//!   host: "127.0.0.1"
//!   port: 3210
//! ```
//!
//! String values may reference the environment with `${VAR}` or
//! `${VAR:-default}`.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Internal links handed to the outline step, in this order.
pub const DEFAULT_INTERNAL_LINKS: [&str; 9] = [
    "https://www.willenskraft.co.at/",
    "https://www.willenskraft.co.at/hundetrainer-ausbildung/",
    "https://www.willenskraft.co.at/online-hundeschule/",
    "https://www.willenskraft.co.at/angebot-nach-regionen/",
    "https://www.willenskraft.co.at/blog-hunde-steiermark/",
    "https://www.willenskraft.co.at/graz-und-umgebung-martha-hoehr/",
    "https://www.willenskraft.co.at/kontakt-hundeschule/",
    "https://www.willenskraft.co.at/e-books-affirmationen-hund/",
    "https://www.willenskraft.co.at/hundeschule-bruck-leitha/",
];

static ENV_REF: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\$\{([^}]+)\}").expect("env reference pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CockpitConfig {
    pub gemini: GeminiConfig,
    pub internal_links: Vec<String>,
    pub server: ServerSection,
}

impl Default for CockpitConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            internal_links: DEFAULT_INTERNAL_LINKS.iter().map(|s| s.to_string()).collect(),
            server: ServerSection::default(),
        }
    }
}

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.0-flash-exp".to_string(),
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3210,
        }
    }
}

impl CockpitConfig {
    /// Parse a config from a YAML string. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse config YAML: {}", e))
    }

    /// Load a config from a file path.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;
        Self::from_yaml(&content)
    }

    /// Load `.env` files, then the optional YAML file, then apply
    /// environment overrides and resolve `${VAR}` references.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        load_dotenv();
        Self::load_from(path)
    }

    /// Like [`CockpitConfig::load`], without reading `.env` files.
    pub fn load_from(path: Option<&str>) -> Result<Self, String> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("[Config] Loading configuration from '{}'", path);
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.resolve_env_refs();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            self.gemini.base_url = url;
        }
        if let Ok(model) = std::env::var("GEMINI_TEXT_MODEL") {
            self.gemini.text_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_IMAGE_MODEL") {
            self.gemini.image_model = model;
        }
    }

    fn resolve_env_refs(&mut self) {
        self.gemini.base_url = resolve_env_vars(&self.gemini.base_url);
        self.gemini.api_key = resolve_env_vars(&self.gemini.api_key);
        self.gemini.text_model = resolve_env_vars(&self.gemini.text_model);
        self.gemini.image_model = resolve_env_vars(&self.gemini.image_model);
        self.server.host = resolve_env_vars(&self.server.host);
        for link in &mut self.internal_links {
            *link = resolve_env_vars(link);
        }
        // An unresolved reference means "not configured".
        if ENV_REF.is_match(&self.gemini.api_key) {
            self.gemini.api_key.clear();
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.gemini.timeout_secs == 0 {
            return Err("gemini.timeout_secs must be greater than 0".to_string());
        }
        if let Some(link) = self.internal_links.iter().find(|l| l.trim().is_empty()) {
            return Err(format!("internal_links contains an empty entry: '{}'", link));
        }
        Ok(())
    }

    /// A copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.gemini.api_key.is_empty() {
            let visible: String = copy.gemini.api_key.chars().take(4).collect();
            copy.gemini.api_key = format!("{}…", visible);
        }
        copy
    }
}

/// Resolve environment variable references in a string.
/// Supports `${ENV_VAR}` and `${ENV_VAR:-default}` syntax.
pub fn resolve_env_vars(input: &str) -> String {
    ENV_REF
        .replace_all(input, |caps: &regex::Captures| {
            let var_expr = &caps[1];
            if let Some((var_name, default_val)) = var_expr.split_once(":-") {
                std::env::var(var_name).unwrap_or_else(|_| default_val.to_string())
            } else {
                std::env::var(var_expr).unwrap_or_else(|_| format!("${{{}}}", var_expr))
            }
        })
        .to_string()
}

/// Load `.env.local` then `.env` if present. Variables already set in the
/// environment win.
pub fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        if dotenvy::from_filename(filename).is_ok() {
            tracing::info!("[Config] Loaded environment from '{}'", filename);
        }
    }
}
