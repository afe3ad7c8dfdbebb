use std::{collections::HashMap, fmt::Display, str::FromStr, time::Duration};

use crate::{Error, Result};

/// Typed, read-only view over the string map passed to
/// [`CadMonitor::configure_from_values`](crate::CadMonitor::configure_from_values).
///
/// Values are trimmed and empty values count as missing.
///
/// ```rust
/// use std::collections::HashMap;
/// use cad_monitor::ConfigValues;
///
/// let map = HashMap::from([
///     ("url".to_string(), "https://cad.example.org".to_string()),
///     ("timeout".to_string(), "15".to_string()),
/// ]);
/// let values = ConfigValues::new(&map);
/// assert_eq!(values.required("url").unwrap(), "https://cad.example.org");
/// assert_eq!(values.parse_or("timeout", 30u32).unwrap(), 15);
/// assert!(!values.flag("debug").unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigValues<'a> {
    values: &'a HashMap<String, String>,
}

impl<'a> ConfigValues<'a> {
    pub fn new(values: &'a HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn optional(&self, key: &str) -> Option<&'a str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, key: &str) -> Result<&'a str> {
        self.optional(key).ok_or_else(|| Error::missing_config(key))
    }

    /// Parse a required value.
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        Self::parse_value(key, self.required(key)?)
    }

    /// Parse an optional value, falling back to `default` when absent.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(key) {
            Some(value) => Self::parse_value(key, value),
            None => Ok(default),
        }
    }

    /// Boolean switch, `false` when absent.
    pub fn flag(&self, key: &str) -> Result<bool> {
        let Some(value) = self.optional(key) else {
            return Ok(false);
        };
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::invalid_config(key, format!("'{value}' is not a boolean"))),
        }
    }

    /// Whole number of seconds as a [`Duration`].
    pub fn seconds(&self, key: &str) -> Result<Option<Duration>> {
        self.optional(key)
            .map(|v| Self::parse_value::<u64>(key, v).map(Duration::from_secs))
            .transpose()
    }

    /// Reject keys outside of `known`, for backends that don't tolerate typos.
    pub fn ensure_known(&self, known: &[&str]) -> Result<()> {
        let mut unknown: Vec<&str> = self
            .values
            .keys()
            .map(String::as_str)
            .filter(|k| !known.contains(k))
            .collect();
        unknown.sort_unstable();
        match unknown.first() {
            Some(key) => Err(Error::invalid_config(key, "unrecognized key")),
            None => Ok(()),
        }
    }

    fn parse_value<T>(key: &str, value: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        value
            .parse()
            .map_err(|e: T::Err| Error::invalid_config(key, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::ConfigValues;
    use crate::Error;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_required_and_blank_values() {
        let values = map(&[("url", " https://cad "), ("blank", "  ")]);
        let cfg = ConfigValues::new(&values);
        assert_eq!(cfg.required("url").unwrap(), "https://cad");
        assert!(matches!(
            cfg.required("blank"),
            Err(Error::MissingConfig { key }) if &*key == "blank"
        ));
        assert!(cfg.optional("nope").is_none());
    }

    #[test]
    fn test_parse() {
        let values = map(&[("port", "8443"), ("retries", "many")]);
        let cfg = ConfigValues::new(&values);
        assert_eq!(cfg.parse::<u16>("port").unwrap(), 8443);
        assert!(matches!(
            cfg.parse::<u8>("retries"),
            Err(Error::InvalidConfig { key, .. }) if &*key == "retries"
        ));
        assert!(matches!(cfg.parse::<u8>("absent"), Err(Error::MissingConfig { .. })));
        assert_eq!(cfg.parse_or("absent", 3u8).unwrap(), 3);
    }

    #[test]
    fn test_flags() {
        let values = map(&[("a", "YES"), ("b", "off"), ("c", "maybe")]);
        let cfg = ConfigValues::new(&values);
        assert!(cfg.flag("a").unwrap());
        assert!(!cfg.flag("b").unwrap());
        assert!(!cfg.flag("missing").unwrap());
        assert!(cfg.flag("c").is_err());
    }

    #[test]
    fn test_seconds() {
        let values = map(&[("keepalive", "45"), ("bad", "-1")]);
        let cfg = ConfigValues::new(&values);
        assert_eq!(cfg.seconds("keepalive").unwrap(), Some(Duration::from_secs(45)));
        assert_eq!(cfg.seconds("missing").unwrap(), None);
        assert!(cfg.seconds("bad").is_err());
    }

    #[test]
    fn test_ensure_known() {
        let values = map(&[("url", "x"), ("usrname", "y"), ("password", "z")]);
        let cfg = ConfigValues::new(&values);
        assert!(cfg.ensure_known(&["url", "usrname", "password"]).is_ok());
        let err = cfg.ensure_known(&["url", "username", "password"]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key, .. } if &*key == "usrname"));
    }
}
