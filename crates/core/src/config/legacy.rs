//! The legacy `.json` config and its defaults

use serde_json::{Map, Value};

pub const LEGACY_CONFIG_FILE: &str = "cypress.json";

pub const DEFAULT_INTEGRATION_FOLDER: &str = "cypress/integration";
pub const DEFAULT_TEST_FILES: &str = "**/*.*";
pub const DEFAULT_COMPONENT_FOLDER: &str = "cypress/component";
pub const DEFAULT_SUPPORT_FILE_STEM: &str = "cypress/support/index";
pub const DEFAULT_PLUGINS_FILE_STEM: &str = "cypress/plugins/index";
pub const DEFAULT_IGNORE_TEST_FILES: &str = "*.hot-update.js";

/// Extensions a support or plugins file may have
pub const SCRIPT_EXTENSIONS: [&str; 3] = ["js", "ts", "coffee"];

/// Keys that describe the layout and are not carried over verbatim
pub const LAYOUT_KEYS: [&str; 6] = [
    "integrationFolder",
    "testFiles",
    "componentFolder",
    "supportFile",
    "ignoreTestFiles",
    "pluginsFile",
];

/// Which nested testing-type block a key may be overridden in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestingType {
    E2e,
    Component,
}

impl TestingType {
    pub fn key(self) -> &'static str {
        match self {
            TestingType::E2e => "e2e",
            TestingType::Component => "component",
        }
    }
}

/// A value as declared in the legacy config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declared {
    Missing,
    False,
    Value(String),
    List(Vec<String>),
}

/// The legacy config object, kept as parsed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyConfig {
    content: Map<String, Value>,
}

impl LegacyConfig {
    pub fn from_json(contents: &str) -> Result<Self, String> {
        match serde_json::from_str::<Value>(contents) {
            Ok(Value::Object(content)) => Ok(Self { content }),
            Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
            Err(e) => Err(e.to_string()),
        }
    }

    pub fn from_map(content: Map<String, Value>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Look a key up in the testing-type block first, then at the top level
    pub fn lookup(&self, key: &str, testing_type: TestingType) -> Declared {
        let nested = self
            .content
            .get(testing_type.key())
            .and_then(Value::as_object)
            .and_then(|block| block.get(key));

        match nested.or_else(|| self.content.get(key)) {
            None | Some(Value::Null) => Declared::Missing,
            Some(Value::Bool(false)) => Declared::False,
            Some(Value::String(s)) => Declared::Value(s.clone()),
            Some(Value::Array(items)) => Declared::List(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Some(other) => Declared::Value(other.to_string()),
        }
    }

    /// Options that are carried over to the new config as they are
    pub fn carried_options(&self) -> Map<String, Value> {
        self.content
            .iter()
            .filter(|(k, _)| !LAYOUT_KEYS.contains(&k.as_str()))
            .filter(|(k, _)| k.as_str() != "e2e" && k.as_str() != "component")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Options from a nested testing-type block, minus layout keys
    pub fn testing_type_options(&self, testing_type: TestingType) -> Map<String, Value> {
        self.content
            .get(testing_type.key())
            .and_then(Value::as_object)
            .map(|block| {
                block
                    .iter()
                    .filter(|(k, _)| !LAYOUT_KEYS.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_object() {
        let err = LegacyConfig::from_json("[1, 2]").unwrap_err();
        assert_eq!(err, "expected a JSON object, found an array");
        assert!(LegacyConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_lookup_prefers_nested_block() {
        let config = LegacyConfig::from_json(
            r#"{
                "componentFolder": "src",
                "supportFile": false,
                "testFiles": ["**/*.spec.js", "**/*.spec.ts"],
                "component": { "componentFolder": "src/components" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.lookup("componentFolder", TestingType::Component),
            Declared::Value("src/components".to_string())
        );
        assert_eq!(
            config.lookup("componentFolder", TestingType::E2e),
            Declared::Value("src".to_string())
        );
        assert_eq!(config.lookup("supportFile", TestingType::E2e), Declared::False);
        assert_eq!(
            config.lookup("integrationFolder", TestingType::E2e),
            Declared::Missing
        );
        assert_eq!(
            config.lookup("testFiles", TestingType::E2e),
            Declared::List(vec!["**/*.spec.js".to_string(), "**/*.spec.ts".to_string()])
        );
    }

    #[test]
    fn test_carried_options_drop_layout_keys() {
        let config = LegacyConfig::from_json(
            r#"{
                "baseUrl": "http://localhost:3000",
                "integrationFolder": "cypress/integration",
                "pluginsFile": false,
                "viewportWidth": 1200,
                "e2e": { "defaultCommandTimeout": 1000, "testFiles": "**/*.js" }
            }"#,
        )
        .unwrap();

        let carried = config.carried_options();
        assert_eq!(carried.len(), 2);
        assert!(carried.contains_key("baseUrl"));
        assert!(carried.contains_key("viewportWidth"));

        let e2e = config.testing_type_options(TestingType::E2e);
        assert_eq!(e2e.len(), 1);
        assert_eq!(e2e["defaultCommandTimeout"], 1000);
        assert!(config.testing_type_options(TestingType::Component).is_empty());
    }
}
