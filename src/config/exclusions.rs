use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    /// qmake (`*.pro`) or CMake project
    Qt,
    Node,
    Rust,
    Generic,
}

pub fn detect_project_type(base_dir: &Path) -> ProjectType {
    if has_qmake_project(base_dir) || base_dir.join("CMakeLists.txt").exists() {
        ProjectType::Qt
    } else if base_dir.join("package.json").exists() {
        ProjectType::Node
    } else if base_dir.join("Cargo.toml").exists() {
        ProjectType::Rust
    } else {
        ProjectType::Generic
    }
}

fn has_qmake_project(base_dir: &Path) -> bool {
    fs::read_dir(base_dir)
        .map(|entries| {
            entries
                .flatten()
                .any(|e| e.path().extension().is_some_and(|ext| ext == "pro"))
        })
        .unwrap_or(false)
}

pub fn get_default_exclusions(project_type: ProjectType) -> Vec<&'static str> {
    let mut exclusions = vec![".git", ".svn", ".hg", ".idea", ".vscode", ".DS_Store"];

    match project_type {
        ProjectType::Qt => {
            exclusions.extend_from_slice(&["build", "debug", "release", ".qmake.stash"]);
        }
        ProjectType::Node => {
            // TypeScript sources share the .ts extension
            exclusions.extend_from_slice(&["node_modules", "dist", "build", "coverage"]);
        }
        ProjectType::Rust => {
            exclusions.extend_from_slice(&["target"]);
        }
        ProjectType::Generic => {
            exclusions.extend_from_slice(&["node_modules", "vendor", "dist", "build", "target"]);
        }
    }

    exclusions
}
