//! Integration Test: Core Independence
//!
//! **Policy**: `hub/core` is the headless state core. It MUST NOT depend on
//! or mention terminal UI crates, so any surface (TUI, headless, a future
//! web UI) can embed it.

use std::fs;

use architectural_enforcement::{code_part, rust_files, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_sources_have_no_ui_imports() {
    let mut violations = Vec::new();
    for file in rust_files("hub/core/src") {
        for (idx, line) in file.lines().iter().enumerate() {
            let code = code_part(line);
            if line.trim_start().starts_with("//") {
                continue;
            }
            if UI_CRATES.iter().any(|c| code.contains(&format!("{c}::"))) {
                violations.push(format!("{}:{} - {}", file.path.display(), idx + 1, line.trim()));
            }
        }
    }
    assert!(violations.is_empty(), "UI imports in core: {violations:#?}");
}

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("hub/core/Cargo.toml"))
        .expect("hub/core/Cargo.toml is readable");
    for krate in UI_CRATES {
        assert!(
            !manifest
                .lines()
                .any(|l| l.trim_start().starts_with(&format!("{krate} "))
                    || l.trim_start().starts_with(&format!("{krate}="))),
            "hub/core depends on {krate}"
        );
    }
}

#[test]
fn test_tui_talks_to_core_through_the_hub() {
    let client = rust_files("tui/src")
        .into_iter()
        .find(|f| f.path.ends_with("hub_client.rs"))
        .expect("tui/src/hub_client.rs exists");
    assert!(client.content.contains("SurfaceEvent"));
    assert!(client.content.contains("HubMessage"));
}
