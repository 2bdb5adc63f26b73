//! `anvil clean`: removing build outputs.

use std::path::{Path, PathBuf};

use anvil_build::{clean_all, clean_platform};

use crate::project::{resolve_project_root, select_variants};
use crate::{CleanArgs, GlobalArgs};

/// Runs the `anvil clean` command.
///
/// Without `--variant` every platform's objects, binaries and manifests are
/// removed. Returns exit code 0 on success.
pub fn run(args: &CleanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let removed = clean(&project_dir, &args.variants)?;

    if !global.quiet {
        if removed.is_empty() {
            eprintln!("Nothing to clean");
        }
        for path in &removed {
            let shown = path.strip_prefix(&project_dir).unwrap_or(path);
            eprintln!("     Removed {}", shown.display());
        }
    }
    Ok(0)
}

/// Removes the outputs of `variants`, or of every platform when empty.
pub fn clean(
    project_dir: &Path,
    variants: &[String],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if variants.is_empty() {
        return Ok(clean_all(project_dir)?);
    }
    let config = anvil_config::load_config(project_dir)?;
    let mut removed = Vec::new();
    for variant in select_variants(&config, variants, false)? {
        removed.extend(clean_platform(project_dir, &variant)?);
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TOML: &str = r#"
[project]
name = "hello"
sources = "src"

[variants.linux]
[variants.win64]
toolchain = "mingw"
"#;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("anvil.toml"), TOML).unwrap();
        for platform in ["linux", "win64"] {
            fs::create_dir_all(tmp.path().join("object").join(platform).join("core")).unwrap();
            fs::create_dir_all(tmp.path().join("build").join(platform)).unwrap();
        }
        fs::create_dir_all(tmp.path().join(".anvil")).unwrap();
        fs::write(tmp.path().join(".anvil/linux.fingerprints"), "").unwrap();
        fs::write(tmp.path().join(".anvil/win64.fingerprints"), "").unwrap();
        tmp
    }

    #[test]
    fn clean_one_variant_leaves_others() {
        let tmp = project();
        let removed = clean(tmp.path(), &["linux".to_string()]).unwrap();
        assert_eq!(removed.len(), 3);
        assert!(!tmp.path().join("object/linux").exists());
        assert!(!tmp.path().join(".anvil/linux.fingerprints").exists());
        assert!(tmp.path().join("object/win64").is_dir());
        assert!(tmp.path().join(".anvil/win64.fingerprints").is_file());
    }

    #[test]
    fn clean_everything() {
        let tmp = project();
        clean(tmp.path(), &[]).unwrap();
        for dir in ["object", "build", ".anvil"] {
            assert!(!tmp.path().join(dir).exists());
        }
        assert!(tmp.path().join("anvil.toml").is_file());
    }

    #[test]
    fn clean_unknown_variant_fails() {
        let tmp = project();
        assert!(clean(tmp.path(), &["osx".to_string()]).is_err());
        assert!(tmp.path().join("object/linux").is_dir());
    }
}
