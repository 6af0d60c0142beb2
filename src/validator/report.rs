use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed, but something looks off
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }

    fn detail(&self) -> Option<(&'static str, &str)> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
        }
    }
}

/// One named check and its outcome
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// What was checked
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }

    /// Pass when `problem` is `None`, otherwise warn with its message
    pub(crate) fn warn_on(name: impl Into<String>, problem: Option<String>) -> Self {
        match problem {
            Some(message) => Self::warning(name, message),
            None => Self::ok(name),
        }
    }
}

/// Checks run against one mzXML run
#[derive(Debug)]
pub struct ValidationReport {
    /// Checks in the order they ran
    pub checks: Vec<ValidationCheck>,
    /// Document the checks ran against
    pub source: String,
}

/// Pass/warn/fail tallies of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Checks that passed
    pub passed: usize,
    /// Checks with warnings
    pub warnings: usize,
    /// Checks that failed
    pub failed: usize,
}

impl ValidationReport {
    /// Create an empty report for `source`
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            source: source.into(),
        }
    }

    /// Record a check
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Tally the checks
    pub fn summary(&self) -> ReportSummary {
        self.checks
            .iter()
            .fold(ReportSummary::default(), |mut summary, check| {
                match check.status {
                    CheckStatus::Ok => summary.passed += 1,
                    CheckStatus::Warning(_) => summary.warnings += 1,
                    CheckStatus::Failed(_) => summary.failed += 1,
                }
                summary
            })
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.summary().failed > 0
    }

    /// Whether any check warned
    pub fn has_warnings(&self) -> bool {
        self.summary().warnings > 0
    }

    fn verdict(&self) -> &'static str {
        let summary = self.summary();
        if summary.failed > 0 {
            "Validation FAILED"
        } else if summary.warnings > 0 {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    /// Render the report for a terminal (plain text without `colorized_output`)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("mzXML Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=======================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Source").bold(), self.source));

            for check in &self.checks {
                let symbol = Emoji(check.status.symbol(), "*");
                let name = match check.status {
                    CheckStatus::Ok => style(check.name.as_str()).green(),
                    CheckStatus::Warning(_) => style(check.name.as_str()).yellow(),
                    CheckStatus::Failed(_) => style(check.name.as_str()).red(),
                };
                output.push_str(&format!("[{}] {}", symbol, name));
                match check.status.detail() {
                    Some((label, msg)) => {
                        let label = match check.status {
                            CheckStatus::Failed(_) => style(label).red().bold(),
                            _ => style(label).yellow().bold(),
                        };
                        output.push_str(&format!(" - {}: {}\n", label, msg));
                    }
                    None => output.push('\n'),
                }
            }

            let summary = self.summary();
            output.push_str(&format!(
                "\n{}: {} passed, {} warnings, {} failed\n\n",
                style("Summary").bold(),
                style(summary.passed).green(),
                style(summary.warnings).yellow(),
                style(summary.failed).red()
            ));
            let verdict = match (summary.failed, summary.warnings) {
                (0, 0) => style(self.verdict()).green().bold(),
                (0, _) => style(self.verdict()).yellow().bold(),
                _ => style(self.verdict()).red().bold(),
            };
            output.push_str(&format!("{}\n", verdict));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mzXML Validation Report")?;
        writeln!(f, "=======================")?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f)?;

        for check in &self.checks {
            write!(f, "[{}] {}", check.status.symbol(), check.name)?;
            match check.status.detail() {
                Some((label, msg)) => writeln!(f, " - {}: {}", label, msg)?,
                None => writeln!(f)?,
            }
        }

        let summary = self.summary();
        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            summary.passed, summary.warnings, summary.failed
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.verdict())
    }
}
