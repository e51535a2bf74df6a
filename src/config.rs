use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use chrono::Local;
use crate::errors::{I18nError, Result};
use crate::i18n::{Catalog, Locale, LocaleSource};
use crate::logging::{LOG_LEVELS, LoggingConfig};
use crate::routing::RoutingPolicy;

pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone)]
pub struct ConfigFile {
    pub version: u32,
    pub config: Config,
    #[serde(default)]
    pub metadata: ConfigMetadata,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct ConfigMetadata {
    pub created_at: String,
    pub last_modified: String,
    pub created_by_version: String,
    pub last_modified_by_version: String,
}

impl ConfigMetadata {
    fn now() -> Self {
        let now = Local::now().to_rfc3339();
        Self {
            created_at: now.clone(),
            last_modified: now,
            created_by_version: env!("CARGO_PKG_VERSION").to_string(),
            last_modified_by_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub default_locale: Locale,
    #[serde(default = "default_true")]
    pub prefix_default_locale: bool,
    #[serde(default)]
    pub base_path: Option<String>,
    #[serde(default)]
    pub locale_source: LocaleSource,
    /// 覆盖内置语言包的目录（包含 en.json / zh.json）
    #[serde(default)]
    pub messages_dir: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: Locale::En,
            prefix_default_locale: true,
            base_path: None,
            locale_source: LocaleSource::Url,
            messages_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn routing_policy(&self) -> RoutingPolicy {
        RoutingPolicy {
            default_locale: self.default_locale,
            prefix_default_locale: self.prefix_default_locale,
            base_path: self.base_path.clone(),
        }
    }

    /// 配置了 messages_dir 时从磁盘加载，否则使用内置语言包
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.messages_dir {
            Some(dir) => Catalog::from_dir(dir),
            None => Ok(Catalog::embedded()),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate_config(config: &Config) -> Result<()> {
        Self::validate_base_path(config.base_path.as_deref())?;
        Self::validate_messages_dir(config.messages_dir.as_deref())?;
        Self::validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_base_path(base_path: Option<&str>) -> Result<()> {
        let Some(base) = base_path else {
            return Ok(());
        };
        if !base.starts_with('/') || base.len() < 2 || base.ends_with('/') {
            return Err(I18nError::ValidationError {
                field: "base_path".to_string(),
                message: format!("Base path must look like \"/segment\", got \"{}\"", base),
            });
        }
        if base.contains(['?', '#']) {
            return Err(I18nError::ValidationError {
                field: "base_path".to_string(),
                message: format!("Base path cannot contain a query or fragment: {}", base),
            });
        }
        Ok(())
    }

    fn validate_messages_dir(dir: Option<&Path>) -> Result<()> {
        match dir {
            Some(dir) if !dir.is_dir() => Err(I18nError::ValidationError {
                field: "messages_dir".to_string(),
                message: format!("Directory does not exist: {}", dir.display()),
            }),
            _ => Ok(()),
        }
    }

    fn validate_logging_config(logging: &LoggingConfig) -> Result<()> {
        if LOG_LEVELS.contains(&logging.level.to_ascii_uppercase().as_str()) {
            Ok(())
        } else {
            Err(I18nError::ValidationError {
                field: "logging.level".to_string(),
                message: format!("Invalid log level: {}. Valid levels: {}",
                               logging.level, LOG_LEVELS.join(", ")),
            })
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
    current_config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    /// 配置文件不存在时使用默认配置，不会自动创建文件
    pub fn load(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            log::debug!("No config at {}, using defaults", config_path.display());
            Config::default()
        };

        Ok(Self {
            config_path,
            current_config: Arc::new(RwLock::new(config)),
        })
    }

    fn load_config(config_path: &Path) -> Result<Config> {
        let content = crate::fileio::read(config_path)?;

        let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| I18nError::ConfigError {
            message: format!("Failed to parse config file {}: {}", config_path.display(), e),
        })?;

        // 顶层有 version 才按带版本的格式解析，否则按裸 Config 解析
        let config_file = match value.get("version") {
            Some(version) => {
                let version = version.as_u64().ok_or_else(|| I18nError::ConfigError {
                    message: format!("Configuration version must be a non-negative integer, got {}", version),
                })?;
                if version > u64::from(CURRENT_CONFIG_VERSION) {
                    return Err(I18nError::ConfigError {
                        message: format!("Configuration version {} is newer than supported version {}",
                                       version, CURRENT_CONFIG_VERSION),
                    });
                }
                serde_json::from_value::<ConfigFile>(value).map_err(|e| I18nError::ConfigError {
                    message: format!("Invalid config file {}: {}", config_path.display(), e),
                })?
            }
            None => {
                let config = serde_json::from_value::<Config>(value).map_err(|e| I18nError::ConfigError {
                    message: format!("Invalid config file {}: {}", config_path.display(), e),
                })?;
                ConfigFile {
                    version: CURRENT_CONFIG_VERSION,
                    config,
                    metadata: ConfigMetadata::now(),
                }
            }
        };

        ConfigValidator::validate_config(&config_file.config)?;
        Ok(config_file.config)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_config(&self) -> Config {
        match self.current_config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update_config<F>(&self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut Config) -> Result<()>,
    {
        let mut candidate = self.get_config();
        updater(&mut candidate)?;
        ConfigValidator::validate_config(&candidate)?;

        match self.current_config.write() {
            Ok(mut config) => *config = candidate,
            Err(poisoned) => *poisoned.into_inner() = candidate,
        }

        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let config_file = ConfigFile {
            version: CURRENT_CONFIG_VERSION,
            config: self.get_config(),
            metadata: ConfigMetadata::now(),
        };
        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| I18nError::ConfigError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        crate::fileio::write(&self.config_path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let config = Config {
            base_path: Some("dashboard/".to_string()),
            ..Config::default()
        };

        let result = ConfigValidator::validate_config(&config);
        assert!(result.is_err());

        if let Err(I18nError::ValidationError { field, message }) = result {
            assert_eq!(field, "base_path");
            assert!(message.contains("Base path"));
        }
    }

    #[test]
    fn test_log_level_validation() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(
            ConfigValidator::validate_config(&config),
            Err(I18nError::ValidationError { field, .. }) if field == "logging.level"
        ));

        config.logging.level = "debug".to_string();
        assert!(ConfigValidator::validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_messages_dir_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            messages_dir: Some(temp_dir.path().join("nope")),
            ..Config::default()
        };
        assert!(ConfigValidator::validate_config(&config).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::load(config_path.clone()).unwrap();
        assert_eq!(manager.get_config(), Config::default());
        assert!(!config_path.exists());
    }

    #[test]
    fn test_update_saves_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("conf").join("config.json");

        let manager = ConfigManager::load(config_path.clone()).unwrap();
        manager
            .update_config(|config| {
                config.default_locale = Locale::Zh;
                config.base_path = Some("/dashboard".to_string());
                config.locale_source = LocaleSource::Router;
                Ok(())
            })
            .unwrap();

        let reloaded = ConfigManager::load(config_path).unwrap().get_config();
        assert_eq!(reloaded.default_locale, Locale::Zh);
        assert_eq!(reloaded.base_path.as_deref(), Some("/dashboard"));
        assert_eq!(reloaded.locale_source, LocaleSource::Router);
        assert_eq!(reloaded.routing_policy().default_locale, Locale::Zh);
    }

    #[test]
    fn test_invalid_update_is_not_applied() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::load(config_path.clone()).unwrap();
        let result = manager.update_config(|config| {
            config.base_path = Some("/".to_string());
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(manager.get_config().base_path, None);
        assert!(!config_path.exists());
    }

    #[test]
    fn test_bare_config_and_newer_version() {
        let temp_dir = TempDir::new().unwrap();
        let bare = temp_dir.path().join("bare.json");
        std::fs::write(&bare, r#"{"default_locale":"zh","prefix_default_locale":false}"#).unwrap();
        let config = ConfigManager::load(bare).unwrap().get_config();
        assert_eq!(config.default_locale, Locale::Zh);
        assert!(!config.prefix_default_locale);
        assert_eq!(config.logging, LoggingConfig::default());

        let newer = temp_dir.path().join("newer.json");
        let content = serde_json::json!({
            "version": CURRENT_CONFIG_VERSION + 1,
            "config": {},
            "metadata": {
                "created_at": "", "last_modified": "",
                "created_by_version": "", "last_modified_by_version": ""
            }
        });
        std::fs::write(&newer, content.to_string()).unwrap();
        assert!(matches!(ConfigManager::load(newer), Err(I18nError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_versioned_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let content = serde_json::json!({
            "version": CURRENT_CONFIG_VERSION,
            "config": { "default_locale": "fr", "base_path": "/dashboard" },
            "metadata": {
                "created_at": "", "last_modified": "",
                "created_by_version": "", "last_modified_by_version": ""
            }
        });
        std::fs::write(&path, content.to_string()).unwrap();

        assert!(matches!(ConfigManager::load(path), Err(I18nError::ConfigError { .. })));
    }

    #[test]
    fn test_versioned_config_without_metadata_keeps_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"version":1,"config":{"default_locale":"zh"}}"#).unwrap();

        let config = ConfigManager::load(path).unwrap().get_config();
        assert_eq!(config.default_locale, Locale::Zh);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let bare = temp_dir.path().join("bare.json");
        std::fs::write(&bare, r#"{"default_locale":"zh","basepath":"/dashboard"}"#).unwrap();
        assert!(matches!(ConfigManager::load(bare), Err(I18nError::ConfigError { .. })));

        let bad_version = temp_dir.path().join("bad_version.json");
        std::fs::write(&bad_version, r#"{"version":"one","config":{}}"#).unwrap();
        assert!(matches!(ConfigManager::load(bad_version), Err(I18nError::ConfigError { .. })));
    }

    #[test]
    fn test_load_catalog_from_messages_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("en.json"), r#"{"Broadcasts":{"Title":"Campaigns"}}"#).unwrap();
        std::fs::write(temp_dir.path().join("zh.json"), r#"{"Broadcasts":{"Title":"活动"}}"#).unwrap();

        let config = Config {
            messages_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };
        let catalog = config.load_catalog().unwrap();
        let t = crate::i18n::Translator::namespaced(&catalog, "Broadcasts");
        assert_eq!(t.resolve(Locale::En, "Title", None), "Campaigns");
    }
}
