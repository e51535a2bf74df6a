mod catalog;
mod detect;
mod interpolate;
mod locale;
mod translator;

use once_cell::sync::Lazy;

pub use catalog::{Catalog, Dictionary, Entry};
pub use detect::{LocaleSignals, LocaleSource, detect_locale};
pub use interpolate::{ParamValue, Params, interpolate};
pub use locale::Locale;
pub use translator::{BoundTranslator, Translator};

// 内置语言包只解析一次，之后只读
static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::embedded);

/// The process-wide catalog built from the embedded dictionaries.
pub fn embedded_catalog() -> &'static Catalog {
    &CATALOG
}

/// 翻译函数：根据 key 和参数获取翻译文本，找不到时返回 key 本身
pub fn t(key: &str, params: Option<&Params>, locale: Locale) -> String {
    Translator::root(&CATALOG).resolve(locale, key, params)
}
