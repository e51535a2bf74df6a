use super::catalog::{Catalog, Entry};
use super::interpolate::{Params, interpolate};
use super::Locale;

/// Resolves keys, optionally under a namespace, against a [`Catalog`].
///
/// Resolution never fails: a missing path, a path that stops at a branch, or a
/// non-string leaf all return the key that was asked for, unchanged.
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    catalog: &'a Catalog,
    namespace: Option<String>,
}

impl<'a> Translator<'a> {
    pub fn new(catalog: &'a Catalog, namespace: Option<&str>) -> Self {
        Self {
            catalog,
            namespace: namespace.map(str::to_string),
        }
    }

    pub fn root(catalog: &'a Catalog) -> Self {
        Self::new(catalog, None)
    }

    pub fn namespaced(catalog: &'a Catalog, namespace: &str) -> Self {
        Self::new(catalog, Some(namespace))
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn full_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, key),
            None => key.to_string(),
        }
    }

    pub fn resolve(&self, locale: Locale, key: &str, params: Option<&Params>) -> String {
        let full_key = self.full_key(key);

        let Some(dictionary) = self.catalog.dictionary(locale) else {
            crate::log_with_metadata!(warn, "No dictionary loaded", "locale" => locale, "key" => full_key);
            return key.to_string();
        };

        match dictionary.get(&full_key) {
            Some(Entry::Text(text)) => match params {
                Some(params) => interpolate(text, params),
                None => text.clone(),
            },
            Some(entry) => {
                crate::log_with_metadata!(warn, "Translation value is not a string",
                    "key" => full_key, "locale" => locale, "kind" => entry.kind());
                key.to_string()
            }
            None => {
                crate::log_with_metadata!(warn, "Translation not found",
                    "key" => full_key, "locale" => locale);
                key.to_string()
            }
        }
    }

    /// 绑定语言，得到调用方可直接使用的翻译函数
    pub fn bind(&self, locale: Locale) -> BoundTranslator<'_> {
        BoundTranslator {
            translator: self,
            locale,
        }
    }
}

/// A translator with its locale fixed, handed to call sites that only know keys.
#[derive(Debug, Clone, Copy)]
pub struct BoundTranslator<'t> {
    translator: &'t Translator<'t>,
    locale: Locale,
}

impl<'t> BoundTranslator<'t> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.resolve(self.locale, key, None)
    }

    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.translator.resolve(self.locale, key, Some(params))
    }

    /// The `(key, params?) -> String` shape expected by rendering code.
    pub fn as_fn(self) -> impl Fn(&str, Option<&Params>) -> String + 't {
        move |key: &str, params: Option<&Params>| self.translator.resolve(self.locale, key, params)
    }
}
