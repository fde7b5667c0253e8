//! PHP values and their `var_export` literal syntax.

use std::fmt::Write as _;

use indexmap::IndexMap;

/// A PHP array key. Strings holding a canonical decimal integer become `Int`,
/// as PHP does when such a string is used as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    pub fn as_string(&self) -> String {
        match self {
            Key::Int(i) => i.to_string(),
            Key::Str(s) => s.clone(),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        let canonical = !s.is_empty()
            && (s == "0" || !s.starts_with('0'))
            && !s.starts_with("-0")
            && !s.starts_with('+');
        match s.parse::<i64>() {
            Ok(i) if canonical => Key::Int(i),
            _ => Key::Str(s.to_string()),
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::from(s.as_str())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

pub type Array = IndexMap<Key, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Array),
}

impl Value {
    /// A list with keys `0..n`.
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Int(i as i64), v))
                .collect(),
        )
    }

    pub fn map<K: Into<Key>, I: IntoIterator<Item = (K, Value)>>(entries: I) -> Self {
        Value::Array(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// PHP `empty()`.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Str(s) => s.is_empty() || s == "0",
            Value::Array(a) => a.is_empty(),
        }
    }

    /// Source literal of this value, as `var_export` prints it.
    pub fn export(&self) -> String {
        let mut out = String::new();
        export_into(self, 1, &mut out);
        out
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => Value::Str(s),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(d) => Value::Str(d.to_string()),
            toml::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            toml::Value::Table(table) => {
                Value::map(table.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::map(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// Single-quoted PHP string literal.
pub fn export_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\0' => out.push_str("' . \"\\0\" . '"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Shortest round-trip float, always with a fraction or exponent.
pub fn export_float(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    // `{:e}` gives the shortest digits, e.g. `1.5e-7`.
    let sci = format!("{:e}", f);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if f != 0.0 && !(-4..15).contains(&exponent) {
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{}.0", mantissa)
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}E{}{}", mantissa, sign, exponent.abs());
    }

    let plain = format!("{}", f);
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

fn spaces(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}

fn export_into(value: &Value, level: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Float(f) => out.push_str(&export_float(*f)),
        Value::Str(s) => out.push_str(&export_string(s)),
        Value::Array(items) => {
            if level > 1 {
                out.push('\n');
                spaces(out, level - 1);
            }
            out.push_str("array (\n");
            for (key, item) in items {
                spaces(out, level + 1);
                match key {
                    Key::Int(i) => {
                        let _ = write!(out, "{}", i);
                    }
                    Key::Str(s) => out.push_str(&export_string(s)),
                }
                out.push_str(" => ");
                export_into(item, level + 2, out);
                out.push_str(",\n");
            }
            if level > 1 {
                spaces(out, level - 1);
            }
            out.push(')');
        }
    }
}
