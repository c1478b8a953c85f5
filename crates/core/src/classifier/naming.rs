//! Spec naming conventions
//!
//! `button.spec.js -> button.cy.js`, `input-spec.tsx -> input.cy.tsx`,
//! `spec.ts -> spec.cy.ts`.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Source extensions a spec may have; preserved by renames
pub const SOURCE_EXTENSIONS: [&str; 5] = ["js", "jsx", "ts", "tsx", "coffee"];

fn spec_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<base>.+?)[._-][sS]pec$").expect("spec suffix pattern"))
}

/// Apply the `.cy.<ext>` naming convention to a file name.
/// Names without a known source extension are returned unchanged.
pub fn normalize_spec_name(file_name: &str) -> String {
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return file_name.to_string();
    };
    if stem.is_empty() || !SOURCE_EXTENSIONS.contains(&ext) || stem.ends_with(".cy") {
        return file_name.to_string();
    }

    let base = spec_suffix()
        .captures(stem)
        .and_then(|caps| caps.name("base"))
        .map_or(stem, |m| m.as_str());
    format!("{base}.cy.{ext}")
}

/// Compute where a spec found under `folder` should live.
///
/// `new_folder` replaces the folder when given; `rename_file` applies
/// [`normalize_spec_name`] to the file name.
pub fn candidate_path(
    spec: &Path,
    folder: &Path,
    new_folder: Option<&Path>,
    rename_file: bool,
) -> PathBuf {
    let relative = spec.strip_prefix(folder).unwrap_or(spec);
    let mut target = new_folder.unwrap_or(folder).join(relative);

    if rename_file {
        if let Some(name) = target.file_name().and_then(|n| n.to_str()) {
            let renamed = normalize_spec_name(name);
            target.set_file_name(renamed);
        }
    }
    target
}

/// Where a support file moves to: `e2e.<ext>` next to the original
pub fn support_file_target(support_file: &Path, stem: &str) -> PathBuf {
    let name = match support_file.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    };
    support_file.with_file_name(name)
}
