//! `anvil init`: project scaffolding command.
//!
//! Creates an `anvil.toml` with one variant and a `src/main.c` that builds
//! out of the box.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anvil_config::CONFIG_FILE_NAME;

/// Runs the `anvil init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
/// Returns exit code 0 on success.
pub fn run(name: Option<String>, toolchain: &str) -> Result<i32, Box<dyn std::error::Error>> {
    // Reject unknown toolchains before touching the filesystem.
    let toolchain = anvil_toolchain::load_toolchain(toolchain)?;

    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };
    if project_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(format!(
            "{CONFIG_FILE_NAME} already exists in {}",
            project_dir.display()
        )
        .into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("hello")
        .to_string();

    eprintln!("  Creating new Anvil project `{project_name}`");
    scaffold(&project_dir, &project_name, toolchain.kind.name())?;
    eprintln!("     Created {}", project_dir.join(CONFIG_FILE_NAME).display());
    eprintln!("     Created {}", project_dir.join("src").join("main.c").display());
    Ok(0)
}

/// Writes the project file and a template source into `root`.
pub fn scaffold(root: &Path, project_name: &str, toolchain: &str) -> io::Result<()> {
    fs::create_dir_all(root.join("src"))?;
    fs::write(root.join(CONFIG_FILE_NAME), config_template(project_name, toolchain))?;
    fs::write(
        root.join("src").join("main.c"),
        "#include <stdio.h>\n\nint main(void)\n{\n    printf(\"Hello, world!\\n\");\n    return 0;\n}\n",
    )
}

fn config_template(project_name: &str, toolchain: &str) -> String {
    format!(
        r#"[project]
name = "{project_name}"
sources = "src"
# modules = ["core"]
include_dirs = []
libraries = []
defines = []
flags = ["-O2"]

[variants.native]
toolchain = "{toolchain}"
"#
    )
}
