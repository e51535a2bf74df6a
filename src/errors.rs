use thiserror::Error;
use crate::i18n::{Locale, Params, t};

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("File operation failed: {path}")]
    FileOperationError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dictionary for locale {locale} could not be loaded: {message}")]
    DictionaryError { locale: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation failed: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
    },

    #[error("Unsupported locale: {code}")]
    UnsupportedLocale { code: String },
}

pub type Result<T> = std::result::Result<T, I18nError>;

impl I18nError {
    /// 获取用户友好的错误信息（通过内置语言包渲染）
    pub fn user_friendly_message(&self, locale: Locale) -> String {
        match self {
            Self::FileOperationError { path, .. } => {
                t("Errors.FileOperation", Some(&Params::from([("path", path.as_str())])), locale)
            }
            Self::DictionaryError { locale: code, message } => t(
                "Errors.Dictionary",
                Some(&Params::from([("locale", code.as_str()), ("message", message.as_str())])),
                locale,
            ),
            Self::ConfigError { message } => {
                t("Errors.Config", Some(&Params::from([("message", message.as_str())])), locale)
            }
            Self::ValidationError { field, message } => t(
                "Errors.Validation",
                Some(&Params::from([("field", field.as_str()), ("message", message.as_str())])),
                locale,
            ),
            Self::UnsupportedLocale { code } => {
                t("Errors.UnsupportedLocale", Some(&Params::from([("code", code.as_str())])), locale)
            }
        }
    }
}

impl From<std::io::Error> for I18nError {
    fn from(error: std::io::Error) -> Self {
        Self::FileOperationError {
            path: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for I18nError {
    fn from(error: serde_json::Error) -> Self {
        Self::ConfigError {
            message: format!("JSON parsing error: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_message_is_localized() {
        let err = I18nError::UnsupportedLocale { code: "fr".to_string() };
        assert_eq!(err.user_friendly_message(Locale::En), "Unsupported language: fr");
        assert_eq!(err.user_friendly_message(Locale::Zh), "不支持的语言：fr");
    }

    #[test]
    fn test_validation_message_carries_field() {
        let err = I18nError::ValidationError {
            field: "base_path".to_string(),
            message: "must start with '/'".to_string(),
        };
        let msg = err.user_friendly_message(Locale::En);
        assert_eq!(msg, "Invalid value for base_path: must start with '/'");
        assert_eq!(err.to_string(), "Validation failed: base_path - must start with '/'");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: I18nError = io.into();
        assert!(matches!(err, I18nError::FileOperationError { ref path, .. } if path == "unknown"));
    }
}
