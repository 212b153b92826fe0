//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async functions in the TUI and the hub core MUST NOT use
//! blocking I/O. Image files are read with `tokio::fs`; stdin is read with
//! `tokio::io`.
//!
//! **Acceptable**: blocking calls in non-async functions (config loading,
//! logging setup before the event loop) and test code.

use architectural_enforcement::{code_part, is_in_async_function, is_test_code, rust_files};

const FORBIDDEN: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("std::process::Command", "Blocking process I/O"),
    ("std::io::stdin()", "Blocking stdin"),
    ("std::thread::sleep", "Blocking sleep"),
];

#[test]
fn test_no_blocking_io_in_async_code() {
    let mut violations = Vec::new();
    for dir in ["tui/src", "hub/core/src"] {
        check_directory(dir, &mut violations);
    }

    if !violations.is_empty() {
        eprintln!("\nBlocking I/O found in async code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nUse tokio::fs / tokio::io inside async functions.");

        panic!(
            "\nFound {} blocking I/O violation(s) in production code.",
            violations.len()
        );
    }
}

fn check_directory(dir: &str, violations: &mut Vec<String>) {
    for file in rust_files(dir) {
        let lines = file.lines();
        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            let Some((_, what)) = FORBIDDEN.iter().find(|(needle, _)| code.contains(needle))
            else {
                continue;
            };
            if is_test_code(&lines, idx) || !is_in_async_function(&lines, idx) {
                continue;
            }

            violations.push(format!(
                "{}:{} - {}: {}",
                file.path.display(),
                idx + 1,
                what,
                line.trim()
            ));
        }
    }
}

#[test]
fn test_image_reads_are_async() {
    let image_rs = rust_files("hub/core/src/analysis")
        .into_iter()
        .find(|f| f.path.ends_with("image.rs"))
        .expect("analysis/image.rs exists");
    assert!(image_rs.content.contains("tokio::fs::"));
}
