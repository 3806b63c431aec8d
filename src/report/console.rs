// Console reporter - run overview printed to stdout

use crate::model::{ReportFeature, ReportStep, Status, StatusCounts};
use crate::state::SuiteReport;
use crate::time::format_duration;
use console::Style;
use std::fmt::Write;

const HEAVY_RULE: &str =
    "════════════════════════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────";

/// Console reporter
pub struct ConsoleReporter {
    color: bool,
    show_steps: bool,
    verbose: bool,
}

impl ConsoleReporter {
    /// Create new console reporter
    pub fn new(color: bool, show_steps: bool, verbose: bool) -> Self {
        Self {
            color,
            show_steps,
            verbose,
        }
    }

    fn paint(&self, status: Status, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let style = match status {
            Status::Passed => Style::new().green(),
            Status::Failed => Style::new().red().bold(),
            Status::Undefined | Status::Pending => Style::new().yellow(),
            Status::Skipped => Style::new().cyan(),
        };
        style.apply_to(text).force_styling(true).to_string()
    }

    fn icon(status: Status) -> &'static str {
        match status {
            Status::Passed => "✅",
            Status::Failed => "❌",
            Status::Undefined => "❔",
            Status::Pending => "⏳",
            Status::Skipped => "⏭️ ",
        }
    }

    /// One line per feature, e.g. `✅ Checkout (0m1.000s)`
    pub fn feature_line(&self, feature: &ReportFeature) -> String {
        format!(
            "{} {} ({})",
            Self::icon(feature.status()),
            self.paint(feature.status(), feature.title()),
            format_duration(feature.duration())
        )
    }

    fn counts_line(&self, label: &str, counts: &StatusCounts) -> String {
        let parts: Vec<String> = Status::ALL
            .iter()
            .rev()
            .filter(|s| counts.count(**s) > 0)
            .map(|s| {
                self.paint(
                    *s,
                    &format!("{} {} ({})", counts.count(*s), s, counts.percentage(*s)),
                )
            })
            .collect();

        if parts.is_empty() {
            format!("   • {}: {}", label, counts.total())
        } else {
            format!("   • {}: {} ({})", label, counts.total(), parts.join(", "))
        }
    }

    fn step_line(&self, step: &ReportStep) -> String {
        let name = if step.keyword().is_empty() {
            step.name().to_string()
        } else {
            format!("{} {}", step.keyword().trim_end(), step.name())
        };
        format!(
            "        {} {}",
            self.paint(step.status(), step.status().as_str()),
            name
        )
    }

    /// Render the full summary
    pub fn render_summary(&self, report: &SuiteReport) -> String {
        let summary = report.summary();
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", HEAVY_RULE);
        let headline = if summary.has_failures() {
            format!(
                "❌ FAILED ({} failed of {} scenarios in {})",
                summary.scenarios.count(Status::Failed),
                summary.scenarios.total(),
                format_duration(report.duration())
            )
        } else {
            format!(
                "✅ PASSED ({} scenarios in {})",
                summary.scenarios.total(),
                format_duration(report.duration())
            )
        };
        let _ = writeln!(out, "{}", headline);
        let _ = writeln!(out, "{}", LIGHT_RULE);

        let _ = writeln!(out, "📊 Execution Statistics:");
        let _ = writeln!(out, "   • Features: {}", summary.features);
        let _ = writeln!(out, "{}", self.counts_line("Scenarios", &summary.scenarios));
        let _ = writeln!(out, "{}", self.counts_line("Steps", &summary.steps));
        let _ = writeln!(out, "   • Duration: {}", format_duration(report.duration()));
        let _ = writeln!(out, "{}", LIGHT_RULE);

        let _ = writeln!(out, "📁 Features:");
        for feature in report.features() {
            let _ = writeln!(out, "   {}", self.feature_line(feature));
            for scenario in feature.scenarios() {
                if !self.show_steps && scenario.status() == Status::Passed {
                    continue;
                }
                let _ = writeln!(
                    out,
                    "      {} {}",
                    Self::icon(scenario.status()),
                    scenario.title()
                );
                if self.show_steps {
                    for step in scenario.steps() {
                        let _ = writeln!(out, "{}", self.step_line(step));
                    }
                }
                for step in scenario.steps() {
                    if let Some(error) = step.error() {
                        let _ = writeln!(out, "        Error: {}", error.message);
                    }
                }
            }
        }

        let _ = writeln!(out, "{}", HEAVY_RULE);
        out
    }
}

impl super::Reporter for ConsoleReporter {
    fn on_feature_end(&self, feature: &ReportFeature) {
        if self.verbose {
            println!("{}", self.feature_line(feature));
        }
    }

    fn on_suite_end(&self, report: &SuiteReport) -> anyhow::Result<()> {
        print!("{}", self.render_summary(report));
        Ok(())
    }
}
