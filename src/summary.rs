//! Fetch outcomes and run counters

/// Terminal state of one image reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
    /// Already present locally, no pull issued
    Skipped,
    /// Pulled successfully
    Succeeded,
    /// Pull failed (network, auth, missing image, timeout, invalid reference)
    Failed,
}

/// Counters for one pull run.
///
/// Each processed reference increments exactly one counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullSummary {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PullSummary {
    pub fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Skipped => self.skipped += 1,
            FetchOutcome::Succeeded => self.success += 1,
            FetchOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Process exit status for a completed run.
    ///
    /// Failed fetches only affect the status when `fail_on_error` is set.
    pub fn exit_code(&self, fail_on_error: bool) -> i32 {
        if fail_on_error && self.has_failures() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_increments_one_counter() {
        let mut summary = PullSummary::default();
        summary.record(FetchOutcome::Skipped);
        summary.record(FetchOutcome::Succeeded);
        summary.record(FetchOutcome::Succeeded);
        summary.record(FetchOutcome::Failed);

        assert_eq!(
            summary,
            PullSummary {
                success: 2,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(summary.total(), 4);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_exit_code_ignores_failures_by_default() {
        let summary = PullSummary {
            success: 3,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(summary.exit_code(false), 0);
    }

    #[test]
    fn test_exit_code_with_fail_on_error() {
        let failed = PullSummary {
            success: 0,
            skipped: 0,
            failed: 1,
        };
        assert_eq!(failed.exit_code(true), 1);

        let clean = PullSummary {
            success: 2,
            skipped: 5,
            failed: 0,
        };
        assert_eq!(clean.exit_code(true), 0);
        assert_eq!(PullSummary::default().exit_code(true), 0);
    }
}
