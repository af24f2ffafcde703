//! Run report.
//!
//! Aggregates [`CheckResult`]s into a summary the runner prints before
//! choosing its exit status.

use std::fmt::{self, Display};

use crate::checker::CheckResult;

/// Summary of a full conformance run.
#[derive(Debug, Default)]
pub struct RunReport {
    results: Vec<CheckResult>,
    passed: usize,
    failed: usize,
}

impl RunReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one check result.
    pub fn record(&mut self, result: CheckResult) {
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Records a batch of check results.
    pub fn record_all(&mut self, results: Vec<CheckResult>) {
        for result in results {
            self.record(result);
        }
    }

    /// Total number of checks recorded.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of passed checks.
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failed checks.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// True when no recorded check failed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// The recorded results, in execution order.
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// The failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            write!(
                f,
                "{} {:<8} {} [{}]",
                status, result.resource, result.operation, result.scheme
            )?;
            if let Some(details) = &result.details {
                write!(f, " - {details}")?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "{} checks: {} passed, {} failed",
            self.total(),
            self.passed,
            self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{CheckResult, Operation};
    use crate::client::Scheme;
    use crate::error::{Assertion, CheckError};
    use http::StatusCode;

    fn pass(resource: &'static str, operation: Operation) -> CheckResult {
        CheckResult::from_outcome(resource, operation, Scheme::Https, Ok(()))
    }

    fn fail(resource: &'static str, operation: Operation) -> CheckResult {
        let outcome = Err(CheckError::from(Assertion::Status {
            expected: StatusCode::NOT_FOUND,
            actual: StatusCode::OK,
        }));
        CheckResult::from_outcome(resource, operation, Scheme::Https, outcome)
    }

    #[test]
    fn test_empty_report_passes() {
        let report = RunReport::new();
        assert_eq!(report.total(), 0);
        assert!(report.all_passed());
    }

    #[test]
    fn test_record_counts() {
        let mut report = RunReport::new();
        report.record(pass("posts", Operation::GetById));
        report.record(fail("posts", Operation::GetByIdMissing));
        report.record(pass("users", Operation::GetCollection));

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_render_contains_failure_details() {
        let mut report = RunReport::new();
        report.record(fail("comments", Operation::GetFilteredMissing));

        let rendered = report.to_string();
        assert!(rendered.contains("FAIL"));
        assert!(rendered.contains("comments"));
        assert!(rendered.contains("GET filtered (out of range)"));
        assert!(rendered.contains("expected status 404"));
        assert!(rendered.contains("1 checks: 0 passed, 1 failed"));
    }
}
