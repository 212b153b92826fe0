//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the TUI and the hub core MUST NOT call
//! sleep methods to wait for events. Async work is awaited, periodic work
//! uses `tokio::time::interval`.
//!
//! **Exceptions**:
//! - Frame rate limiting (TUI `app.rs` only)
//! - Simulated inference latency (mock classifier only)
//! - Test code

use architectural_enforcement::{code_part, context_contains, is_test_code, rust_files};

struct SleepPolicy {
    allow_frame_limiting: bool,
    allow_simulated_latency: bool,
}

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    check_directory(
        "tui/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: true,
            allow_simulated_latency: false,
        },
    );
    check_directory(
        "hub/core/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: false,
            allow_simulated_latency: true,
        },
    );

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nAcceptable sleep uses:");
        eprintln!("  - Frame rate limiting in tui/src/app.rs");
        eprintln!("  - The mock classifier's simulated latency");
        eprintln!("  - Test code");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

fn check_directory(dir: &str, violations: &mut Vec<String>, policy: &SleepPolicy) {
    for file in rust_files(dir) {
        let lines = file.lines();
        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            if !(code.contains("::sleep(") || code.contains(".sleep(")) {
                continue;
            }
            if is_test_code(&lines, idx) {
                continue;
            }
            if policy.allow_frame_limiting
                && file.path.ends_with("tui/src/app.rs")
                && context_contains(&lines, idx, 10, 5, &["frame", "fps"])
            {
                continue;
            }
            if policy.allow_simulated_latency
                && file.path.ends_with("analysis/mock.rs")
                && context_contains(&lines, idx, 6, 2, &["delay"])
            {
                continue;
            }
            if context_contains(&lines, idx, 20, 5, &["interval.tick()"]) {
                continue;
            }

            violations.push(format!(
                "{}:{} - {}",
                file.path.display(),
                idx + 1,
                line.trim()
            ));
        }
    }
}

#[test]
fn test_frame_limiting_detection() {
    let code = vec![
        "fn render_loop() {",
        "    let frame_duration = Duration::from_millis(100); // 10 FPS",
        "    loop {",
        "        render();",
        "        tokio::time::sleep(frame_duration).await;",
        "    }",
        "}",
    ];
    assert!(context_contains(&code, 4, 10, 5, &["frame", "fps"]));
}
