use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;

/// 占位符：`{name}`，name 仅限 ASCII 单词字符
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid")
});

/// A single interpolation argument: text or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::UInt(n) => write!(f, "{}", n),
            Self::Float(x) => write_float(f, *x),
        }
    }
}

/// 与 JS 的 Number 字符串化一致：-0 -> "0"，|x| >= 1e21 或 < 1e-6 用指数形式
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    }
    if x.is_infinite() {
        return f.write_str(if x.is_sign_negative() { "-Infinity" } else { "Infinity" });
    }
    if x == 0.0 {
        return f.write_str("0");
    }

    let magnitude = x.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        // LowerExp 输出 "1e21" / "1.5e-7"，正指数需补 '+'
        let formatted = format!("{:e}", x);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{}e+{}", mantissa, exp),
            _ => f.write_str(&formatted),
        };
    }

    // f64 的 Display 对整数值不带小数部分：2.0 -> "2"
    write!(f, "{}", x)
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

macro_rules! int_param {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Int(value as i64)
                }
            }
        )*
    };
}

int_param!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        // usize 不超过 64 位
        Self::UInt(value as u64)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Named interpolation arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().fold(Self::new(), |params, (k, v)| params.with(k, v))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// 替换模板中的 `{name}` 占位符；缺失的参数保留原样。
/// 单遍替换，替换进来的文本不会被再次扫描。
pub fn interpolate(template: &str, params: &Params) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match params.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_known_placeholder() {
        let params = Params::from([("name", "Ada")]);
        assert_eq!(interpolate("Hello {name}", &params), "Hello Ada");
    }

    #[test]
    fn test_missing_placeholder_left_literal() {
        let params = Params::from([("name", "Ada")]);
        assert_eq!(interpolate("Hello {other}", &params), "Hello {other}");
    }

    #[test]
    fn test_partial_resolution_per_placeholder() {
        let params = Params::new().with("from", 1).with("total", 40);
        assert_eq!(
            interpolate("Showing {from}-{to} of {total}", &params),
            "Showing 1-{to} of 40"
        );
    }

    #[test]
    fn test_number_formatting() {
        let params = Params::new()
            .with("a", 2.0)
            .with("b", 1.5)
            .with("c", f64::INFINITY)
            .with("d", -3i32);
        assert_eq!(interpolate("{a} {b} {c} {d}", &params), "2 1.5 Infinity -3");
    }

    #[test]
    fn test_integer_limits_keep_their_value() {
        let params = Params::new()
            .with("max", usize::MAX)
            .with("big", u64::MAX)
            .with("min", i64::MIN);
        assert_eq!(
            interpolate("{max}|{big}|{min}", &params),
            format!("{}|18446744073709551615|-9223372036854775808", usize::MAX)
        );
    }

    #[test]
    fn test_float_edge_formatting() {
        let params = Params::new()
            .with("large", 1e21)
            .with("small", 1.5e-7)
            .with("negzero", -0.0)
            .with("neglarge", -2.5e22)
            .with("plain", 123456789012345680000.0)
            .with("tiny", 0.000001)
            .with("nan", f64::NAN);
        assert_eq!(
            interpolate("{large} {small} {negzero} {neglarge} {plain} {tiny} {nan}", &params),
            "1e+21 1.5e-7 0 -2.5e+22 123456789012345680000 0.000001 NaN"
        );
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let params = Params::new().with("a", "{b}").with("b", "x");
        assert_eq!(interpolate("{a}", &params), "{b}");
    }

    #[test]
    fn test_non_word_tokens_untouched() {
        let params = Params::from([("first name", "Ada")]);
        assert_eq!(interpolate("{first name} {}", &params), "{first name} {}");
    }

    #[test]
    fn test_empty_value_replaces_token() {
        let params = Params::from([("suffix", "")]);
        assert_eq!(interpolate("file{suffix}.txt", &params), "file.txt");
    }
}
