//! The current config format and its script renderings

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_E2E_FOLDER: &str = "cypress/e2e";
pub const MIGRATED_SPEC_GLOB: &str = "**/*.cy.{js,jsx,ts,tsx,coffee}";
pub const DEFAULT_E2E_SUPPORT_STEM: &str = "e2e";
pub const DEFAULT_COMPONENT_SUPPORT_STEM: &str = "component";

/// The script format of a current-format config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Js,
    Ts,
    Coffee,
}

impl ConfigFormat {
    pub const ALL: [ConfigFormat; 3] = [ConfigFormat::Js, ConfigFormat::Ts, ConfigFormat::Coffee];

    pub fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Js => "js",
            ConfigFormat::Ts => "ts",
            ConfigFormat::Coffee => "coffee",
        }
    }

    /// Project-relative path of a config file in this format
    pub fn file_name(self) -> PathBuf {
        PathBuf::from(format!("cypress.config.{}", self.extension()))
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    fn header(self) -> &'static str {
        match self {
            ConfigFormat::Js => "const { defineConfig } = require('cypress')\n\nmodule.exports = ",
            ConfigFormat::Ts => "import { defineConfig } from 'cypress'\n\nexport default ",
            ConfigFormat::Coffee => "{ defineConfig } = require('cypress')\n\nmodule.exports = ",
        }
    }

    fn setup_node_events(self, indent: &str, plugins: &str, comma: &str) -> String {
        match self {
            ConfigFormat::Js | ConfigFormat::Ts => format!(
                "{indent}setupNodeEvents(on, config) {{\n{indent}  return require('./{plugins}')(on, config)\n{indent}}}{comma}"
            ),
            ConfigFormat::Coffee => format!(
                "{indent}setupNodeEvents: ((on, config) -> require('./{plugins}')(on, config)){comma}"
            ),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A current-format config: the object and its rendered file contents.
///
/// Inside `value`, `e2e.setupNodeEvents` holds the path of the legacy
/// plugins file; rendering turns it into a function requiring that file.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConfigFile {
    pub format: ConfigFormat,
    pub path: PathBuf,
    pub value: Value,
    pub content: String,
}

impl NewConfigFile {
    pub fn new(format: ConfigFormat, value: Value) -> Result<Self, serde_json::Error> {
        let content = render(format, &value)?;
        Ok(Self {
            format,
            path: format.file_name(),
            value,
            content,
        })
    }

    /// Parse a config file previously rendered by [`NewConfigFile::new`]
    pub fn parse(path: &Path, content: &str) -> Result<Self, String> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ConfigFormat::from_extension)
            .ok_or_else(|| format!("unsupported config file {}", path.display()))?;
        let value = parse_body(content)?;
        Ok(Self {
            format,
            path: path.to_path_buf(),
            value,
            content: content.to_string(),
        })
    }

    /// The nested block for a testing type, if present
    pub fn block(&self, key: &str) -> Option<&serde_json::Map<String, Value>> {
        self.value.get(key).and_then(Value::as_object)
    }
}

fn json_setup_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^(?P<indent> *)"setupNodeEvents": "(?P<path>[^"]*)"(?P<comma>,?)$"#)
            .expect("setupNodeEvents json pattern")
    })
}

fn script_setup_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?m)^(?P<indent> *)setupNodeEvents(?:\(on, config\) \{\n *return require\('\./(?P<js>[^']*)'\)\(on, config\)\n *\}",
            r"|: \(\(on, config\) -> require\('\./(?P<coffee>[^']*)'\)\(on, config\)\))(?P<comma>,?)$"
        ))
        .expect("setupNodeEvents script pattern")
    })
}

/// Render a config object as a script in the given format
pub fn render(format: ConfigFormat, value: &Value) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string_pretty(value)?;
    let body = json_setup_line().replace_all(&body, |caps: &Captures| {
        format.setup_node_events(&caps["indent"], &caps["path"], &caps["comma"])
    });
    Ok(format!("{}defineConfig({})\n", format.header(), body))
}

fn parse_body(content: &str) -> Result<Value, String> {
    let marker = "defineConfig(";
    let start = content
        .find(marker)
        .ok_or_else(|| "no defineConfig(..) call found".to_string())?
        + marker.len();
    let end = content
        .rfind(')')
        .filter(|end| *end >= start)
        .ok_or_else(|| "unterminated defineConfig(..) call".to_string())?;

    let body = script_setup_block().replace_all(&content[start..end], |caps: &Captures| {
        let plugins = caps
            .name("js")
            .or_else(|| caps.name("coffee"))
            .map(|m| m.as_str())
            .unwrap_or_default();
        format!(
            "{}\"setupNodeEvents\": \"{}\"{}",
            &caps["indent"], plugins, &caps["comma"]
        )
    });

    serde_json::from_str(&body).map_err(|e| format!("config object is not in a supported form: {e}"))
}
