use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

/// How locales appear in dashboard URLs.
///
/// Detection and switching both read the same policy, so a path produced by
/// [`localized_path`] is always detected as the locale it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    #[serde(default)]
    pub default_locale: Locale,
    /// 默认语言是否也带 URL 前缀（`/en/...`）
    #[serde(default = "default_prefix_default_locale")]
    pub prefix_default_locale: bool,
    /// 应用挂载路径，例如 `/dashboard`；语言段位于其后
    #[serde(default)]
    pub base_path: Option<String>,
}

fn default_prefix_default_locale() -> bool {
    true
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            default_locale: Locale::En,
            prefix_default_locale: true,
            base_path: None,
        }
    }
}

/// Where a locale switch sends the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub path: String,
    pub locale: Locale,
}

/// The host's navigation primitive. Navigation is fire-and-forget.
pub trait Navigator {
    fn navigate(&mut self, target: &NavigationTarget);
}

impl<F> Navigator for F
where
    F: FnMut(&NavigationTarget),
{
    fn navigate(&mut self, target: &NavigationTarget) {
        self(target)
    }
}

/// 拆分出 `?query` / `#fragment`，只对路径部分做语言处理
fn split_suffix(path: &str) -> (&str, &str) {
    match path.find(['?', '#']) {
        Some(idx) => path.split_at(idx),
        None => (path, ""),
    }
}

impl RoutingPolicy {
    fn split_base<'p>(&self, path: &'p str) -> (&'p str, &'p str) {
        if let Some(base) = self.base_path.as_deref().filter(|b| !b.is_empty()) {
            if path == base {
                return (path, "/");
            }
            if path.starts_with(base) && path[base.len()..].starts_with('/') {
                return path.split_at(base.len());
            }
        }
        ("", path)
    }
}

/// `/zh`, `/zh/...` -> (Zh, remainder). `/zhfoo` is not a locale prefix.
fn strip_locale_prefix(path: &str) -> Option<(Locale, &str)> {
    let rest = path.strip_prefix('/')?;
    let (segment, remainder) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };
    let locale = Locale::ALL.into_iter().find(|l| l.code() == segment)?;
    Some((locale, remainder))
}

/// The locale named by the path's locale segment, if any.
pub fn path_locale(policy: &RoutingPolicy, path: &str) -> Option<Locale> {
    let (pathname, _) = split_suffix(path);
    let (_, rest) = policy.split_base(pathname);
    strip_locale_prefix(rest).map(|(locale, _)| locale)
}

/// The locale a path is currently served in; unprefixed paths belong to the default locale.
pub fn current_locale(policy: &RoutingPolicy, path: &str) -> Locale {
    path_locale(policy, path).unwrap_or(policy.default_locale)
}

/// Rewrites `path` so that it is served in `locale`.
pub fn localized_path(policy: &RoutingPolicy, path: &str, locale: Locale) -> String {
    let (pathname, suffix) = split_suffix(path);
    let (base, rest) = policy.split_base(pathname);

    let rest = if rest.is_empty() { "/" } else { rest };
    let stripped = strip_locale_prefix(rest).map(|(_, r)| r).unwrap_or(rest);

    let localized = if locale == policy.default_locale && !policy.prefix_default_locale {
        stripped.to_string()
    } else if stripped == "/" {
        format!("/{}", locale.code())
    } else {
        format!("/{}{}", locale.code(), stripped)
    };

    let joined = if !base.is_empty() && localized == "/" {
        base.to_string()
    } else {
        format!("{}{}", base, localized)
    };
    format!("{}{}", joined, suffix)
}

/// 切换语言：语言未变化时不导航，返回 `None`
pub fn switch_language<N: Navigator + ?Sized>(
    policy: &RoutingPolicy,
    current_path: &str,
    new_locale: Locale,
    navigator: &mut N,
) -> Option<NavigationTarget> {
    let current = current_locale(policy, current_path);
    if current == new_locale {
        log::debug!("Locale already {}, no navigation for {}", new_locale, current_path);
        return None;
    }

    let target = NavigationTarget {
        path: localized_path(policy, current_path, new_locale),
        locale: new_locale,
    };
    crate::log_with_metadata!(info, "Switching locale",
        "from" => current, "to" => new_locale, "path" => target.path);
    navigator.navigate(&target);
    Some(target)
}
