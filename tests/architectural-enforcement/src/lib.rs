//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code
//! - No blocking I/O inside async functions
//! - The hub core stays free of terminal UI crates
//!
//! The helpers here scan source text line by line. They are heuristics, not
//! a parser, and err on the side of flagging.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, resolved from this crate's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// A scanned source file
pub struct SourceFile {
    /// Path, relative to the workspace root
    pub path: PathBuf,
    /// File contents
    pub content: String,
}

impl SourceFile {
    /// Contents split into lines
    pub fn lines(&self) -> Vec<&str> {
        self.content.lines().collect()
    }
}

/// All `.rs` files under a workspace-relative directory
///
/// Panics if the directory does not exist, so a moved crate cannot make a
/// check pass vacuously.
pub fn rust_files(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let base = root.join(dir);
    assert!(
        base.exists(),
        "architectural check target {} does not exist",
        base.display()
    );

    walkdir::WalkDir::new(&base)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            let path = e
                .path()
                .strip_prefix(&root)
                .unwrap_or(e.path())
                .to_path_buf();
            Some(SourceFile { path, content })
        })
        .collect()
}

/// The code part of a line, with any trailing `//` comment removed
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Whether the line is a function signature; `Some(true)` for `async fn`
pub fn fn_signature(line: &str) -> Option<bool> {
    let mut rest = line.trim();
    for prefix in ["pub(crate) ", "pub(super) ", "pub "] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    if rest.starts_with("async fn ") {
        Some(true)
    } else if rest.starts_with("fn ") {
        Some(false)
    } else {
        None
    }
}

/// Whether the line sits after a `#[cfg(test)]` marker in the same file
pub fn is_in_test_module(lines: &[&str], current_idx: usize) -> bool {
    lines[..current_idx]
        .iter()
        .any(|l| l.trim() == "#[cfg(test)]")
}

/// Whether the line sits in a function marked `#[test]` or `#[tokio::test]`
pub fn is_in_test_function(lines: &[&str], current_idx: usize) -> bool {
    let Some(fn_idx) = enclosing_fn(lines, current_idx) else {
        return false;
    };

    for i in (0..fn_idx).rev() {
        let line = lines[i].trim();
        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }
        if !line.starts_with("#[") && !line.starts_with("///") {
            break;
        }
    }
    false
}

/// Whether the line is test code of either kind
pub fn is_test_code(lines: &[&str], current_idx: usize) -> bool {
    is_in_test_module(lines, current_idx) || is_in_test_function(lines, current_idx)
}

/// Whether the enclosing function is `async`
pub fn is_in_async_function(lines: &[&str], current_idx: usize) -> bool {
    enclosing_fn(lines, current_idx)
        .and_then(|i| fn_signature(lines[i]))
        .unwrap_or(false)
}

/// Index of the nearest function signature above the line
fn enclosing_fn(lines: &[&str], current_idx: usize) -> Option<usize> {
    for i in (0..=current_idx).rev() {
        if fn_signature(lines[i]).is_some() {
            return Some(i);
        }
        let line = lines[i].trim();
        if line.starts_with("mod ") || (line.starts_with("impl") && line.contains('{')) {
            return None;
        }
    }
    None
}

/// Whether any line in the window around `current_idx` contains one of `needles`
pub fn context_contains(
    lines: &[&str],
    current_idx: usize,
    before: usize,
    after: usize,
    needles: &[&str],
) -> bool {
    let start = current_idx.saturating_sub(before);
    let end = std::cmp::min(current_idx + after, lines.len());
    lines[start..end].iter().any(|l| {
        let lower = l.to_lowercase();
        needles.iter().any(|n| lower.contains(n))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_signature() {
        assert_eq!(fn_signature("    pub async fn run(&mut self) {"), Some(true));
        assert_eq!(fn_signature("fn helper() {"), Some(false));
        assert_eq!(fn_signature("pub(crate) fn load() {"), Some(false));
        assert_eq!(fn_signature("let f = 1;"), None);
    }

    #[test]
    fn test_async_detection() {
        let code = vec![
            "pub async fn handle(&mut self) {",
            "    let contents = std::fs::read_to_string(\"file.txt\")?;",
            "}",
        ];
        assert!(is_in_async_function(&code, 1));

        let code = vec![
            "pub fn load_config() -> Result<(), Error> {",
            "    let contents = std::fs::read_to_string(\"config.toml\")?;",
            "}",
        ];
        assert!(!is_in_async_function(&code, 1));
    }

    #[test]
    fn test_test_detection() {
        let code = vec![
            "#[tokio::test]",
            "async fn test_something() {",
            "    tokio::time::sleep(d).await;",
            "}",
        ];
        assert!(is_in_test_function(&code, 2));

        let code = vec![
            "fn real() {}",
            "#[cfg(test)]",
            "mod tests {",
            "    fn helper() { tokio::time::sleep(d); }",
            "}",
        ];
        assert!(!is_in_test_module(&code, 0));
        assert!(is_in_test_module(&code, 3));
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
