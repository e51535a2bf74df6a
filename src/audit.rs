use serde::Serialize;
use std::collections::BTreeSet;

use crate::i18n::{Catalog, Dictionary, Locale};

/// A path present in one locale but absent from another. Only the topmost
/// absent path is reported; its descendants are implied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MissingKey {
    pub key: String,
    pub kind: &'static str,
    pub present_in: Locale,
    pub missing_in: Locale,
}

/// A path whose entry kind differs between two locales (e.g. text vs branch).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct KindMismatch {
    pub key: String,
    pub left: (Locale, &'static str),
    pub right: (Locale, &'static str),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    pub missing: Vec<MissingKey>,
    pub mismatched: Vec<KindMismatch>,
    /// 所有语言中出现过的可翻译文本路径数
    pub checked_keys: usize,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

/// 检查各语言字典结构是否一致
pub fn audit(catalog: &Catalog) -> AuditReport {
    let locales: Vec<Locale> = catalog.locales().collect();
    let mut report = AuditReport::default();
    let mut text_keys = BTreeSet::new();
    let mut mismatched = BTreeSet::new();
    let mut missing = BTreeSet::new();

    for &locale in &locales {
        if let Some(dictionary) = catalog.dictionary(locale) {
            text_keys.extend(dictionary.keys().into_iter().map(str::to_string));
        }
    }

    for (i, &left) in locales.iter().enumerate() {
        for &right in &locales[i + 1..] {
            let (Some(l), Some(r)) = (catalog.dictionary(left), catalog.dictionary(right)) else {
                continue;
            };

            collect_missing(l, left, r, right, &mut missing);
            collect_missing(r, right, l, left, &mut missing);

            for (path, entry) in l.entries() {
                if let Some(other) = r.get(path) {
                    if other.kind() != entry.kind() {
                        mismatched.insert(KindMismatch {
                            key: path.to_string(),
                            left: (left, entry.kind()),
                            right: (right, other.kind()),
                        });
                    }
                }
            }
        }
    }

    for item in &missing {
        log::warn!(
            "{} has no {} translation for {} ({})",
            item.present_in, item.missing_in, item.key, item.kind
        );
    }
    for item in &mismatched {
        log::warn!(
            "{} is {} in {} but {} in {}",
            item.key, item.left.1, item.left.0, item.right.1, item.right.0
        );
    }

    report.missing = missing.into_iter().collect();
    report.mismatched = mismatched.into_iter().collect();
    report.checked_keys = text_keys.len();
    report
}

// 父路径同样缺失时只报告父路径
fn collect_missing(
    present: &Dictionary,
    present_in: Locale,
    other: &Dictionary,
    missing_in: Locale,
    missing: &mut BTreeSet<MissingKey>,
) {
    for (path, entry) in present.entries() {
        if other.get(path).is_some() {
            continue;
        }
        let parent_missing = path
            .rsplit_once('.')
            .is_some_and(|(parent, _)| other.get(parent).is_none());
        if !parent_missing {
            missing.insert(MissingKey {
                key: path.to_string(),
                kind: entry.kind(),
                present_in,
                missing_in,
            });
        }
    }
}
