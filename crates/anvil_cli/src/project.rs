//! Locating the project and choosing which variants a command applies to.

use std::path::{Path, PathBuf};

use anvil_config::{AnvilConfig, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `anvil.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `anvil.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match &global.config {
        Some(config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_file() {
                Ok(p.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")))
            } else {
                Ok(p)
            }
        }
        None => find_project_root(&std::env::current_dir()?),
    }
}

/// Picks the variants to act on.
///
/// Explicit names win and keep their order. `all` selects every variant in
/// name order. Otherwise a single defined variant is selected automatically.
pub fn select_variants(
    config: &AnvilConfig,
    requested: &[String],
    all: bool,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if !requested.is_empty() {
        if let Some(unknown) = requested.iter().find(|v| !config.variants.contains_key(*v)) {
            return Err(format!(
                "unknown variant '{unknown}' (defined: {})",
                variant_list(config)
            )
            .into());
        }
        let mut selected: Vec<String> = Vec::with_capacity(requested.len());
        for name in requested {
            if !selected.contains(name) {
                selected.push(name.clone());
            }
        }
        return Ok(selected);
    }

    let names: Vec<String> = config.variants.keys().cloned().collect();
    match names.len() {
        0 => Err(format!("no variants defined in {CONFIG_FILE_NAME}").into()),
        1 => Ok(names),
        _ if all => Ok(names),
        _ => Err(format!(
            "multiple variants defined ({}); use --variant to select one or --all",
            variant_list(config)
        )
        .into()),
    }
}

fn variant_list(config: &AnvilConfig) -> String {
    config
        .variants
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
