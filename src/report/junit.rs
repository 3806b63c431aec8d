// JUnit reporter - features as test suites, scenarios as test cases

use super::Reporter;
use crate::model::{ReportScenario, Status};
use crate::state::SuiteReport;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// JUnit reporter
pub struct JunitReporter {
    output_path: PathBuf,
}

impl JunitReporter {
    /// Create new JUnit reporter
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    /// Build the XML document
    pub fn render(report: &SuiteReport) -> String {
        let summary = report.summary();
        let not_run = |counts: &crate::model::StatusCounts| {
            counts.count(Status::Skipped)
                + counts.count(Status::Pending)
                + counts.count(Status::Undefined)
        };

        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuites name=\"gherkin-report\" time=\"{:.3}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\">\n",
            report.duration().as_secs_f64(),
            summary.scenarios.total(),
            summary.scenarios.count(Status::Failed),
            not_run(&summary.scenarios)
        ));

        for feature in report.features() {
            let scenarios = feature.scenarios();
            let failures = scenarios
                .iter()
                .filter(|s| s.status() == Status::Failed)
                .count();
            let skipped = scenarios
                .iter()
                .filter(|s| {
                    matches!(
                        s.status(),
                        Status::Skipped | Status::Pending | Status::Undefined
                    )
                })
                .count();

            xml.push_str(&format!(
                "  <testsuite name=\"{}\" file=\"{}\" time=\"{:.3}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\">\n",
                escape(feature.title()),
                escape(feature.file()),
                feature.duration().as_secs_f64(),
                scenarios.len(),
                failures,
                skipped
            ));

            for scenario in scenarios {
                push_testcase(&mut xml, feature.title(), scenario);
            }

            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");
        xml
    }
}

fn push_testcase(xml: &mut String, classname: &str, scenario: &ReportScenario) {
    xml.push_str(&format!(
        "    <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\">\n",
        escape(&testcase_name(scenario)),
        escape(classname),
        scenario.duration().as_secs_f64()
    ));

    match scenario.status() {
        Status::Failed => {
            let error = scenario.steps().iter().find_map(|s| s.error());
            let msg = error.map(|e| e.message.as_str()).unwrap_or("Scenario failed");
            let kind = error
                .and_then(|e| e.kind.as_deref())
                .unwrap_or("AssertionError");
            let trace = error.map(|e| e.backtrace.join("\n")).unwrap_or_default();

            xml.push_str(&format!(
                "      <failure message=\"{}\" type=\"{}\">{}</failure>\n",
                escape(msg),
                escape(kind),
                escape(&trace)
            ));
        }
        Status::Skipped | Status::Pending | Status::Undefined => {
            xml.push_str(&format!(
                "      <skipped message=\"{}\" />\n",
                scenario.status()
            ));
        }
        Status::Passed => {}
    }

    xml.push_str("    </testcase>\n");
}

/// Outline rows share a title; their example values tell them apart
fn testcase_name(scenario: &ReportScenario) -> String {
    match scenario.example() {
        Some(values) if !values.is_empty() => {
            let params: Vec<String> = values.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{} [{}]", scenario.title(), params.join(", "))
        }
        _ => scenario.title().to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

impl Reporter for JunitReporter {
    fn on_suite_end(&self, report: &SuiteReport) -> Result<()> {
        let xml = Self::render(report);

        let mut file = File::create(&self.output_path).with_context(|| {
            format!(
                "Failed to create JUnit report file: {}",
                self.output_path.display()
            )
        })?;

        file.write_all(xml.as_bytes())
            .context("Failed to write JUnit XML content")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }
}
