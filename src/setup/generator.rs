//! Writes a configuration tree back out as a loadable `config.inc.php`.

use chrono::{DateTime, Utc};

use super::config_file::{ConfigSource, SERVERS};
use super::value::{Array, Key, Value};

/// Line ending of the generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Eol {
    #[default]
    Unix,
    Windows,
}

impl Eol {
    pub fn as_str(self) -> &'static str {
        match self {
            Eol::Unix => "\n",
            Eol::Windows => "\r\n",
        }
    }
}

/// Lists of at most this many items stay on one line.
const INLINE_LIST_MAX: usize = 4;

#[derive(Debug, Clone)]
pub struct ConfigGenerator {
    eol: Eol,
    generated_at: Option<DateTime<Utc>>,
}

impl ConfigGenerator {
    pub fn new(eol: Eol) -> Self {
        Self {
            eol,
            generated_at: None,
        }
    }

    /// Stamp the header with `at` instead of the current time.
    #[cfg(test)]
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn generate(&self, source: &dyn ConfigSource) -> String {
        let crlf = self.eol.as_str();
        let mut conf = source.config();
        let date = self
            .generated_at
            .unwrap_or_else(Utc::now)
            .format("%a, %d %b %Y %H:%M:%S %z");

        let mut ret = format!(
            "<?php{crlf}/**{crlf} * Generated configuration file{crlf} * Generated by: schema-draw {} setup script{crlf} * Date: {date}{crlf} */{crlf}{crlf}",
            env!("CARGO_PKG_VERSION"),
        );

        // Anything but a non-empty server list is written like any other setting.
        let servers_key = Key::from(SERVERS);
        let is_server_list = match conf.get(&servers_key) {
            Some(Value::Array(servers)) => !servers.is_empty(),
            Some(value) if !value.is_empty() => {
                tracing::warn!("{} setting is not a list, writing it as a plain value", SERVERS);
                false
            }
            _ => false,
        };
        if is_server_list {
            if let Some(Value::Array(servers)) = conf.shift_remove(&servers_key) {
                ret.push_str(&self.server_part(source, &servers));
            }
        }

        let mut persist_keys = source.persist_keys();
        for (key, value) in &conf {
            let key = sanitize(&key.as_string());
            ret.push_str(&self.var_export(&key, value));
            persist_keys.shift_remove(&key);
        }

        // Persisted defaults are only written for top-level keys.
        for key in persist_keys {
            if key.contains('/') {
                continue;
            }
            let key = sanitize(&key);
            ret.push_str(&self.var_export(&key, &source.default_value(&key)));
        }

        ret.push_str(crlf);
        ret
    }

    fn var_export(&self, name: &str, value: &Value) -> String {
        let crlf = self.eol.as_str();
        let items = match value {
            Value::Array(items) if !items.is_empty() => items,
            _ => return format!("$cfg['{}'] = {};{}", name, value.export(), crlf),
        };

        if is_zero_based(items) {
            return format!("$cfg['{}'] = {};{}", name, self.export_list(items), crlf);
        }

        let mut ret = String::new();
        for (key, item) in items {
            ret.push_str(&format!(
                "$cfg['{}']['{}'] = {};{}",
                name,
                sanitize(&key.as_string()),
                item.export(),
                crlf
            ));
        }
        ret
    }

    fn export_list(&self, items: &Array) -> String {
        let crlf = self.eol.as_str();
        let literals: Vec<String> = items.values().map(Value::export).collect();
        let mut ret = String::from("array(");
        if literals.len() <= INLINE_LIST_MAX {
            ret.push_str(&literals.join(", "));
        } else {
            for (i, literal) in literals.iter().enumerate() {
                if i > 0 {
                    ret.push(',');
                }
                ret.push_str(crlf);
                ret.push_str("    ");
                ret.push_str(literal);
            }
        }
        ret.push(')');
        ret
    }

    fn server_part(&self, source: &dyn ConfigSource, servers: &Array) -> String {
        if source.server_count() == 0 {
            return String::new();
        }
        let crlf = self.eol.as_str();

        let mut ret = format!("/* Servers configuration */{crlf}$i = 0;{crlf}{crlf}");
        for (id, server) in servers {
            let label = format!("{} [{}] ", source.server_name(id), id.as_string()).replace('*', "-");
            ret.push_str(&format!("/* Server: {label}*/{crlf}$i++;{crlf}"));
            if let Value::Array(entries) = server {
                for (key, value) in entries {
                    let literal = match value {
                        Value::Array(items) if is_zero_based(items) => self.export_list(items),
                        _ => value.export(),
                    };
                    ret.push_str(&format!(
                        "$cfg['Servers'][$i]['{}'] = {};{}",
                        sanitize(&key.as_string()),
                        literal,
                        crlf
                    ));
                }
            }
            ret.push_str(crlf);
        }
        ret.push_str(&format!("/* End of servers configuration */{crlf}{crlf}"));
        ret
    }
}

/// Replace everything outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// True when every position `0..len` holds a non-null value, i.e. the array
/// is a plain list.
fn is_zero_based(items: &Array) -> bool {
    (0..items.len() as i64).all(|i| !matches!(items.get(&Key::Int(i)), None | Some(Value::Null)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::config_file::ConfigFile;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn generator() -> ConfigGenerator {
        ConfigGenerator::new(Eol::Unix).generated_at(Utc.with_ymd_and_hms(2026, 10, 15, 8, 30, 0).unwrap())
    }

    fn header() -> String {
        format!(
            "<?php\n/**\n * Generated configuration file\n * Generated by: schema-draw {} setup script\n * Date: Thu, 15 Oct 2026 08:30:00 +0000\n */\n\n",
            env!("CARGO_PKG_VERSION")
        )
    }

    fn body(config: &ConfigFile) -> String {
        let text = generator().generate(config);
        text.strip_prefix(&header()).unwrap().to_string()
    }

    fn config(entries: Vec<(&str, Value)>) -> ConfigFile {
        ConfigFile::new(entries.into_iter().map(|(k, v)| (Key::from(k), v)).collect())
    }

    #[test]
    fn test_scalars_and_empty_arrays() {
        let cfg = config(vec![
            ("blowfish_secret", Value::from("s3cr'et")),
            ("MaxRows", Value::Int(50)),
            ("ShowStats", Value::Bool(false)),
            ("UploadDir", Value::Null),
            ("Export", Value::list([])),
        ]);
        assert_eq!(
            body(&cfg),
            "$cfg['blowfish_secret'] = 's3cr\\'et';\n\
             $cfg['MaxRows'] = 50;\n\
             $cfg['ShowStats'] = false;\n\
             $cfg['UploadDir'] = NULL;\n\
             $cfg['Export'] = array (\n);\n\
             \n"
        );
    }

    #[test]
    fn test_short_list_is_inline() {
        let cfg = config(vec![(
            "Numbers",
            Value::list([Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]),
        )]);
        assert_eq!(body(&cfg), "$cfg['Numbers'] = array(1, 2, 3, 4);\n\n");
    }

    #[test]
    fn test_long_list_one_per_line() {
        let cfg = config(vec![("Numbers", Value::list((1..=5).map(Value::Int)))]);
        assert_eq!(
            body(&cfg),
            "$cfg['Numbers'] = array(\n    1,\n    2,\n    3,\n    4,\n    5);\n\n"
        );
    }

    #[test]
    fn test_map_emits_one_line_per_key() {
        let cfg = config(vec![(
            "Export",
            Value::map([
                ("format", Value::from("sql")),
                ("sql-compat", Value::from("NONE")),
                ("charset", Value::list([Value::from("utf8")])),
            ]),
        )]);
        assert_eq!(
            body(&cfg),
            "$cfg['Export']['format'] = 'sql';\n\
             $cfg['Export']['sql_compat'] = 'NONE';\n\
             $cfg['Export']['charset'] = array (\n  0 => 'utf8',\n);\n\
             \n"
        );
    }

    #[test]
    fn test_list_with_null_is_not_zero_based() {
        let cfg = config(vec![("Items", Value::list([Value::Null, Value::Int(1)]))]);
        assert_eq!(
            body(&cfg),
            "$cfg['Items']['0'] = NULL;\n$cfg['Items']['1'] = 1;\n\n"
        );
    }

    #[test]
    fn test_top_level_keys_sanitized() {
        let cfg = config(vec![("Some-Key.name", Value::Int(1))]);
        assert_eq!(body(&cfg), "$cfg['Some_Key_name'] = 1;\n\n");
    }

    #[test]
    fn test_servers_block() {
        let cfg = config(vec![
            (
                "Servers",
                Value::list([
                    Value::map([
                        ("host", Value::from("db*main/1")),
                        ("auth_type", Value::from("cookie")),
                        ("hide_db", Value::list([Value::from("mysql"), Value::from("sys")])),
                        ("extra", Value::map([("a", Value::Int(1))])),
                    ]),
                    Value::map([("verbose", Value::from("Replica"))]),
                ]),
            ),
            ("ServerDefault", Value::Int(1)),
        ]);
        assert_eq!(
            body(&cfg),
            "/* Servers configuration */\n\
             $i = 0;\n\
             \n\
             /* Server: db-main/1 [1] */\n\
             $i++;\n\
             $cfg['Servers'][$i]['host'] = 'db*main/1';\n\
             $cfg['Servers'][$i]['auth_type'] = 'cookie';\n\
             $cfg['Servers'][$i]['hide_db'] = array('mysql', 'sys');\n\
             $cfg['Servers'][$i]['extra'] = array (\n  'a' => 1,\n);\n\
             \n\
             /* Server: Replica [2] */\n\
             $i++;\n\
             $cfg['Servers'][$i]['verbose'] = 'Replica';\n\
             \n\
             /* End of servers configuration */\n\
             \n\
             $cfg['ServerDefault'] = 1;\n\
             \n"
        );
    }

    #[test]
    fn test_empty_servers_written_as_setting() {
        let cfg = config(vec![("Servers", Value::list([])), ("A", Value::Int(1))]);
        assert_eq!(body(&cfg), "$cfg['Servers'] = array (\n);\n$cfg['A'] = 1;\n\n");
    }

    #[test]
    fn test_scalar_servers_written_as_setting() {
        let cfg = config(vec![("Servers", Value::from("x")), ("A", Value::Int(1))]);
        assert_eq!(body(&cfg), "$cfg['Servers'] = 'x';\n$cfg['A'] = 1;\n\n");
    }

    #[test]
    fn test_persisted_defaults_fill_missing_keys() {
        let mut cfg = config(vec![("DefaultLang", Value::from("de"))]);
        cfg.persist("DefaultLang");
        cfg.persist("ThemeDefault");
        cfg.persist("Servers/1/host");
        cfg.set_default("DefaultLang", Value::from("en"));
        cfg.set_default("ThemeDefault", Value::from("pmahomme"));
        cfg.set_default("Servers/1/host", Value::from("localhost"));

        assert_eq!(
            body(&cfg),
            "$cfg['DefaultLang'] = 'de';\n$cfg['ThemeDefault'] = 'pmahomme';\n\n"
        );
    }

    #[test]
    fn test_windows_line_endings() {
        let cfg = config(vec![("Numbers", Value::list((1..=5).map(Value::Int)))]);
        let text = ConfigGenerator::new(Eol::Windows).generate(&cfg);
        assert!(text.starts_with("<?php\r\n/**\r\n"));
        assert!(text.contains("array(\r\n    1,\r\n    2,"));
        assert!(text.ends_with(");\r\n\r\n"));
        assert!(!text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a-b c/d"), "a_b_c_d");
        assert_eq!(sanitize("Ok_09"), "Ok_09");
        assert_eq!(sanitize("é"), "_");
    }
}
