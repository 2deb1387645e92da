// Reject lint-suppression attributes ("#[" + "allow" + ...) in bannerbridge sources.
// The callback paths must stay warning-clean; a suppression is treated as a build failure.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const SKIP_ENV: &str = "BANNERBRIDGE_CHECK_NO_ALLOW";
const CHECKED_DIRS: [&str; 2] = ["src", "tests"];

fn main() {
    println!("cargo:rerun-if-env-changed={SKIP_ENV}");

    if env::var(SKIP_ENV).is_ok_and(|v| v == "0") {
        return;
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));

    let mut violations = Vec::new();
    for relative in CHECKED_DIRS {
        let path = manifest_dir.join(relative);
        if !path.exists() {
            continue;
        }
        println!("cargo:rerun-if-changed={}", path.display());
        collect_violations(&path, &mut violations);
    }

    if violations.is_empty() {
        return;
    }

    eprintln!("ERROR: lint suppressions found in bannerbridge:");
    for (file, line, content) in &violations {
        eprintln!("  {}:{}: {}", file.display(), line, content.trim());
    }
    panic!("{} lint suppression attribute(s) found", violations.len());
}

fn collect_violations(path: &Path, violations: &mut Vec<(PathBuf, usize, String)>) {
    if path.is_dir() {
        if path.ends_with("target") {
            return;
        }
        for entry in fs::read_dir(path).expect("read dir") {
            let entry = entry.expect("dir entry");
            collect_violations(&entry.path(), violations);
        }
        return;
    }

    if path.extension().map_or(true, |ext| ext != "rs") {
        return;
    }

    let Ok(content) = fs::read_to_string(path) else {
        return;
    };

    violations.extend(
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| line.contains("#[allow") || line.contains("#![allow"))
            .map(|(idx, line)| (path.to_path_buf(), idx + 1, line.to_string())),
    );
}
