//! Translation resolution for the engagement dashboard: namespaced key lookup
//! against the `en` / `zh` dictionaries, `{name}` interpolation, locale
//! detection and locale-prefixed routing.

pub mod audit;
pub mod config;
pub mod errors;
pub mod fileio;
pub mod i18n;
pub mod logging;
pub mod routing;

pub use errors::{I18nError, Result};
pub use i18n::{
    BoundTranslator, Catalog, Dictionary, Locale, LocaleSignals, LocaleSource, Params, Translator,
    detect_locale, t,
};
pub use routing::{NavigationTarget, Navigator, RoutingPolicy, switch_language};
