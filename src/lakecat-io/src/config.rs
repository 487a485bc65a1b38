use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// String key/value properties, kept in insertion order.
pub type Properties = IndexMap<String, String>;

/// File store configuration handed to every [`crate::IOClient`].
///
/// The catalog forwards its non-reserved properties here verbatim; nothing is
/// interpreted at this layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IOConfig {
    properties: Properties,
}

impl IOConfig {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns a new config with `overrides` layered on top; on conflict the override wins.
    pub fn merge<'a, I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut properties = self.properties.clone();
        for (key, value) in overrides {
            properties.insert(key.clone(), value.clone());
        }
        Self { properties }
    }

    pub fn multiline_display(&self) -> Vec<String> {
        self.properties
            .iter()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IOConfig {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for IOConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IOConfig\n{}", self.multiline_display().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_win() {
        let catalog = IOConfig::from_iter([("warehouse", "/tmp/wh"), ("io.region", "us-east-1")]);
        let table: Properties = [("io.region", "eu-west-1"), ("write.format", "parquet")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let merged = catalog.merge(&table);
        assert_eq!(merged.get("warehouse"), Some("/tmp/wh"));
        assert_eq!(merged.get("io.region"), Some("eu-west-1"));
        assert_eq!(merged.get("write.format"), Some("parquet"));
        assert_eq!(merged.properties().len(), 3);

        // the base config is left untouched
        assert_eq!(catalog.get("io.region"), Some("us-east-1"));
    }

    #[test]
    fn test_merge_empty() {
        let catalog = IOConfig::from_iter([("warehouse", "/tmp/wh")]);
        assert_eq!(catalog.merge(&Properties::new()), catalog);
        assert!(IOConfig::default().merge(&Properties::new()).is_empty());
    }

    #[test]
    fn test_serde_is_a_plain_map() {
        let config = IOConfig::from_iter([("a", "1"), ("b", "2")]);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
        assert_eq!(serde_json::from_str::<IOConfig>(&json).unwrap(), config);
    }
}
