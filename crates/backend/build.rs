use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// target/<profile> directory derived from OUT_DIR (target/<profile>/build/backend-xxx/out)
fn profile_dir() -> Option<PathBuf> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").ok()?);
    let profile = env::var("PROFILE").ok()?;
    out_dir
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let source_config = workspace_root.join("config.toml");
    if !source_config.exists() {
        return;
    }

    // load_config() ищет config.toml рядом с исполняемым файлом
    match profile_dir() {
        Some(dir) => {
            let dest = dir.join("config.toml");
            if let Err(e) = fs::copy(&source_config, &dest) {
                println!("cargo:warning=Failed to copy config.toml to {:?}: {}", dest, e);
            }
        }
        None => println!("cargo:warning=Target profile directory not found, config.toml not copied"),
    }
}
