use crate::report::report_model::SuiteReport;

/// Format a suite report for the terminal.
///
/// ```text
/// === Walkthrough: happy path ===
///
/// ✓ PASS  happy path (9 steps, 6 assertions)
///
/// === Results: 1 passed, 0 failed (1 total), checklist at 3 ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Walkthrough: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker,
            result.script_name,
            result.steps_run,
            result.assertion_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for ar in result.assertion_results.iter().filter(|ar| !ar.passed) {
            let detail = ar.message.as_deref().unwrap_or("assertion failed");
            let actual = ar.actual.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "    [FAIL] Step {}: {}: {} (actual: {})\n",
                ar.step_index,
                ar.assertion.name(),
                detail,
                actual
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total), checklist at {}",
        report.passed, report.failed, report.total, report.completed_step_count
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}
