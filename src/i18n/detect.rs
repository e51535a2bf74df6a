use serde::{Deserialize, Serialize};

use super::Locale;
use crate::routing::{RoutingPolicy, path_locale};

/// Which external signal decides the locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleSource {
    /// URL 路径前缀，其次浏览器语言
    #[default]
    Url,
    /// 路由器提供的当前语言字段
    Router,
}

/// Read-only environment signals available to a rendering context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleSignals<'a> {
    pub path: Option<&'a str>,
    pub browser_language: Option<&'a str>,
    pub router_locale: Option<&'a str>,
    /// 客户端挂载完成前为 false（服务端渲染阶段）
    pub mounted: bool,
}

/// Picks the locale for one rendering context.
///
/// Before mount the URL source always answers with the default locale, so the
/// server-rendered and first client-rendered output are identical.
pub fn detect_locale(source: LocaleSource, policy: &RoutingPolicy, signals: &LocaleSignals<'_>) -> Locale {
    match source {
        LocaleSource::Url => detect_from_url(policy, signals),
        LocaleSource::Router => signals
            .router_locale
            .and_then(Locale::from_code)
            .unwrap_or(policy.default_locale),
    }
}

fn detect_from_url(policy: &RoutingPolicy, signals: &LocaleSignals<'_>) -> Locale {
    if !signals.mounted {
        return policy.default_locale;
    }
    if let Some(locale) = signals.path.and_then(|path| path_locale(policy, path)) {
        return locale;
    }
    // 默认语言不带前缀时，无前缀路径就是默认语言
    if !policy.prefix_default_locale {
        return policy.default_locale;
    }
    signals
        .browser_language
        .and_then(Locale::from_code)
        .unwrap_or(policy.default_locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(path: &'static str, browser: Option<&'static str>) -> LocaleSignals<'static> {
        LocaleSignals {
            path: Some(path),
            browser_language: browser,
            router_locale: None,
            mounted: true,
        }
    }

    #[test]
    fn test_pre_mount_is_default() {
        let policy = RoutingPolicy::default();
        let signals = LocaleSignals {
            mounted: false,
            ..mounted("/zh/journeys", Some("zh-CN"))
        };
        assert_eq!(detect_locale(LocaleSource::Url, &policy, &signals), Locale::En);
    }

    #[test]
    fn test_path_prefix_wins_over_browser() {
        let policy = RoutingPolicy::default();
        assert_eq!(
            detect_locale(LocaleSource::Url, &policy, &mounted("/zh/journeys", Some("en-US"))),
            Locale::Zh
        );
        assert_eq!(
            detect_locale(LocaleSource::Url, &policy, &mounted("/en", Some("zh-CN"))),
            Locale::En
        );
    }

    #[test]
    fn test_browser_language_fallback() {
        let policy = RoutingPolicy::default();
        assert_eq!(
            detect_locale(LocaleSource::Url, &policy, &mounted("/journeys", Some("zh-TW"))),
            Locale::Zh
        );
        assert_eq!(
            detect_locale(LocaleSource::Url, &policy, &mounted("/journeys", Some("fr-FR"))),
            Locale::En
        );
        assert_eq!(detect_locale(LocaleSource::Url, &policy, &mounted("/journeys", None)), Locale::En);
    }

    #[test]
    fn test_unprefixed_default_ignores_browser() {
        let policy = RoutingPolicy {
            prefix_default_locale: false,
            ..RoutingPolicy::default()
        };
        assert_eq!(
            detect_locale(LocaleSource::Url, &policy, &mounted("/journeys", Some("zh-CN"))),
            Locale::En
        );
    }

    #[test]
    fn test_router_source() {
        let policy = RoutingPolicy::default();
        let signals = LocaleSignals {
            router_locale: Some("zh"),
            ..LocaleSignals::default()
        };
        assert_eq!(detect_locale(LocaleSource::Router, &policy, &signals), Locale::Zh);

        let unknown = LocaleSignals {
            router_locale: Some("ja"),
            ..LocaleSignals::default()
        };
        assert_eq!(detect_locale(LocaleSource::Router, &policy, &unknown), Locale::En);
        assert_eq!(
            detect_locale(LocaleSource::Router, &policy, &LocaleSignals::default()),
            Locale::En
        );
    }
}
