//! Config conversion
//!
//! Builds the current-format config from the legacy one and writes it.
//! The new file is written durably before the legacy file is removed, and
//! a config file this session did not create is never overwritten.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::classifier::naming::support_file_target;
use crate::config::target::{
    DEFAULT_COMPONENT_SUPPORT_STEM, DEFAULT_E2E_FOLDER, DEFAULT_E2E_SUPPORT_STEM,
    MIGRATED_SPEC_GLOB,
};
use crate::config::{ConfigFormat, LegacyConfig, NewConfigFile, TestingType};
use crate::error::{Error, Result};
use crate::interfaces::{ConfigStore, FileSystem};
use crate::types::{LegacyLayout, SupportFile};

/// What the rename steps have changed on disk, read when deriving the
/// new spec patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigratedConventions {
    /// The integration folder now lives at `cypress/e2e`
    pub e2e_folder_renamed: bool,
    /// Spec names follow the `.cy.<ext>` convention
    pub spec_names_normalized: bool,
    /// New location of the support file, when it was renamed
    pub renamed_support_file: Option<PathBuf>,
    /// Specs the user deferred keep their legacy name and folder
    pub deferred_specs: bool,
    /// Some specs were already renamed into `cypress/e2e` while the
    /// integration folder stayed
    pub partially_moved: bool,
}

impl MigratedConventions {
    /// Conventions after every rename step of `layout` completed
    pub fn complete(layout: &LegacyLayout) -> Self {
        Self {
            e2e_folder_renamed: layout.integration_folder.is_default,
            spec_names_normalized: layout.test_files.is_default,
            renamed_support_file: layout
                .support_file
                .path()
                .map(|p| support_file_target(p, DEFAULT_E2E_SUPPORT_STEM)),
            deferred_specs: false,
            partially_moved: false,
        }
    }
}

pub struct ConfigRewriter {
    fs: Arc<dyn FileSystem>,
    store: Arc<dyn ConfigStore>,
    created: HashSet<PathBuf>,
}

impl ConfigRewriter {
    pub fn new(fs: Arc<dyn FileSystem>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            fs,
            store,
            created: HashSet::new(),
        }
    }

    /// `ts` when the project has a tsconfig, `coffee` when its plugins
    /// file is CoffeeScript, `js` otherwise
    pub fn infer_format(&self, layout: &LegacyLayout) -> Result<ConfigFormat> {
        for tsconfig in ["tsconfig.json", "cypress/tsconfig.json"] {
            if self.fs.exists(Path::new(tsconfig))? {
                return Ok(ConfigFormat::Ts);
            }
        }
        let coffee_plugins = layout
            .plugins_file
            .as_deref()
            .and_then(Path::extension)
            .is_some_and(|e| e == "coffee");
        Ok(if coffee_plugins {
            ConfigFormat::Coffee
        } else {
            ConfigFormat::Js
        })
    }

    /// Build the new config for the project. Fails with
    /// [`Error::ConfigAlreadyExistsError`] when a config file exists that
    /// this rewriter did not create.
    pub fn rewrite(
        &self,
        legacy: &LegacyConfig,
        layout: &LegacyLayout,
        conventions: &MigratedConventions,
    ) -> Result<NewConfigFile> {
        self.ensure_no_foreign_config()?;
        let format = self.infer_format(layout)?;
        build_config(legacy, layout, conventions, format)
    }

    /// Write the config, then remove the legacy file
    pub fn write(&mut self, config: &NewConfigFile) -> Result<PathBuf> {
        self.ensure_no_foreign_config()?;
        let path = self.store.write_config(config.format, &config.content)?;
        self.created.insert(path.clone());
        self.store.remove_legacy_config()?;
        Ok(path)
    }

    /// Create `cypress/support/component.<ext>` unless a component support
    /// file already exists. Returns the path when one was written.
    pub fn scaffold_component_support(&mut self, format: ConfigFormat) -> Result<Option<PathBuf>> {
        let support_dir = Path::new("cypress/support");
        for ext in crate::classifier::naming::SOURCE_EXTENSIONS {
            let existing = support_dir.join(format!("{DEFAULT_COMPONENT_SUPPORT_STEM}.{ext}"));
            if self.fs.exists(&existing)? {
                debug!("Component support file {} already exists", existing.display());
                return Ok(None);
            }
        }

        let path = support_dir.join(format!(
            "{DEFAULT_COMPONENT_SUPPORT_STEM}.{}",
            format.extension()
        ));
        self.fs.write_durable(&path, component_support_template(format))?;
        self.created.insert(path.clone());
        info!("Created component support file {}", path.display());
        Ok(Some(path))
    }

    fn ensure_no_foreign_config(&self) -> Result<()> {
        for format in ConfigFormat::ALL {
            let path = format.file_name();
            if !self.created.contains(&path) && self.fs.exists(&path)? {
                return Err(Error::ConfigAlreadyExistsError { path });
            }
        }
        Ok(())
    }
}

/// Assemble the new config object and render it
pub fn build_config(
    legacy: &LegacyConfig,
    layout: &LegacyLayout,
    conventions: &MigratedConventions,
    format: ConfigFormat,
) -> Result<NewConfigFile> {
    let mut value = legacy.carried_options();

    let spec_glob = if conventions.spec_names_normalized {
        MIGRATED_SPEC_GLOB
    } else {
        layout.test_files.pattern.as_str()
    };

    let mut e2e = legacy.testing_type_options(TestingType::E2e);
    e2e.insert(
        "specPattern".to_string(),
        e2e_spec_pattern(layout, conventions, spec_glob),
    );
    let support_file = match (&layout.support_file, &conventions.renamed_support_file) {
        (SupportFile::Disabled, _) => Value::Bool(false),
        (SupportFile::Path(_), Some(renamed)) => path_value(renamed),
        (SupportFile::Path(original), None) => path_value(original),
    };
    e2e.insert("supportFile".to_string(), support_file);
    insert_exclude(&mut e2e, &layout.ignore_test_files);
    if let Some(plugins) = &layout.plugins_file {
        e2e.insert("setupNodeEvents".to_string(), path_value(plugins));
    }
    value.insert("e2e".to_string(), Value::Object(e2e));

    if let Some(folder) = layout.component_folder.as_ref().filter(|_| layout.uses_component_testing) {
        let mut component = legacy.testing_type_options(TestingType::Component);
        component.insert(
            "specPattern".to_string(),
            Value::String(spec_pattern(&folder.path, spec_glob)),
        );
        insert_exclude(&mut component, &layout.ignore_test_files);
        value.insert("component".to_string(), Value::Object(component));
    }

    let config = NewConfigFile::new(format, Value::Object(value))?;
    debug!("Rendered {} ({} bytes)", config.path.display(), config.content.len());
    Ok(config)
}

/// Deferred specs keep matching through the legacy folder and glob, next
/// to the specs already moved to `cypress/e2e`
fn e2e_spec_pattern(layout: &LegacyLayout, conventions: &MigratedConventions, glob: &str) -> Value {
    let folder = &layout.integration_folder.path;
    if conventions.e2e_folder_renamed {
        return Value::String(spec_pattern(Path::new(DEFAULT_E2E_FOLDER), glob));
    }
    if !conventions.deferred_specs {
        return Value::String(spec_pattern(folder, glob));
    }

    let legacy = Value::String(spec_pattern(folder, &layout.test_files.pattern));
    if conventions.partially_moved {
        Value::Array(vec![
            Value::String(spec_pattern(Path::new(DEFAULT_E2E_FOLDER), glob)),
            legacy,
        ])
    } else {
        legacy
    }
}

fn spec_pattern(folder: &Path, glob: &str) -> String {
    let folder = folder.to_string_lossy();
    if folder.is_empty() {
        glob.to_string()
    } else {
        format!("{folder}/{glob}")
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

fn insert_exclude(block: &mut Map<String, Value>, ignore_test_files: &[String]) {
    let value = match ignore_test_files {
        [] => return,
        [single] => Value::String(single.clone()),
        many => Value::Array(many.iter().cloned().map(Value::String).collect()),
    };
    block.insert("excludeSpecPattern".to_string(), value);
}

fn component_support_template(format: ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Js | ConfigFormat::Ts => {
            "// Loaded automatically before every component spec file.\n\
             // Put global configuration and behavior for component tests here.\n"
        }
        ConfigFormat::Coffee => {
            "# Loaded automatically before every component spec file.\n\
             # Put global configuration and behavior for component tests here.\n"
        }
    }
}
