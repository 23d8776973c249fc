use figment::Provider;
use figment::providers::{Data, Format, Json, Toml, Yaml};
use figment::value::{Dict, Map};
use figment::Profile;
use std::path::Path;

/// Configuration file formats accepted by `--config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick a format from the file extension, falling back to the content
    pub fn detect(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => Self::Toml,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            _ => match std::fs::read_to_string(path) {
                Ok(content) => {
                    let format = Self::from_content(&content);
                    tracing::debug!("Detected {:?} config for {}", format, path.display());
                    format
                }
                Err(_) => Self::Toml,
            },
        }
    }

    fn from_content(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            return Self::Json;
        }

        let first_setting = trimmed
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('['));
        match first_setting {
            Some(line) if line == "---" => Self::Yaml,
            Some(line) if line.contains(':') && !line.contains('=') => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

/// Smart configuration file loader that chooses the right format for `path`.
/// Returns a provider that can be directly used with figment.merge()
pub fn auto<P: AsRef<Path>>(path: P) -> SmartProvider {
    let path = path.as_ref();
    match ConfigFormat::detect(path) {
        ConfigFormat::Toml => SmartProvider::Toml(Toml::file(path)),
        ConfigFormat::Json => SmartProvider::Json(Json::file(path)),
        ConfigFormat::Yaml => SmartProvider::Yaml(Yaml::file(path)),
    }
}

/// Wrapper enum to handle different provider types
pub enum SmartProvider {
    Toml(Data<Toml>),
    Json(Data<Json>),
    Yaml(Data<Yaml>),
}

impl Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}
