//! Per-device results and the run-wide summary built from them.

use crate::network::target::TargetAddress;
use crate::vendor::Vendor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    Success,
    Failed { reason: String },
    Undetected,
}

/// Final word on one address. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRunResult {
    pub address: TargetAddress,
    pub vendor: Option<Vendor>,
    pub downtime_secs: Option<u64>,
    pub status: DeviceStatus,
}

impl DeviceRunResult {
    pub fn success(address: TargetAddress, vendor: Vendor, downtime_secs: u64) -> Self {
        Self {
            address,
            vendor: Some(vendor),
            downtime_secs: Some(downtime_secs),
            status: DeviceStatus::Success,
        }
    }

    pub fn failed(address: TargetAddress, vendor: Vendor, reason: impl Into<String>) -> Self {
        Self {
            address,
            vendor: Some(vendor),
            downtime_secs: None,
            status: DeviceStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn undetected(address: TargetAddress) -> Self {
        Self {
            address,
            vendor: None,
            downtime_secs: None,
            status: DeviceStatus::Undetected,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_downtime_secs: u64,
    pub results: Vec<DeviceRunResult>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|status| matches!(status, DeviceStatus::Success))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, DeviceStatus::Failed { .. }))
    }

    pub fn undetected(&self) -> usize {
        self.count(|status| matches!(status, DeviceStatus::Undetected))
    }

    fn count(&self, pred: impl Fn(&DeviceStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }
}

impl Extend<DeviceRunResult> for RunSummary {
    fn extend<I: IntoIterator<Item = DeviceRunResult>>(&mut self, iter: I) {
        for result in iter {
            self.total_downtime_secs += result.downtime_secs.unwrap_or(0);
            self.results.push(result);
        }
    }
}

impl FromIterator<DeviceRunResult> for RunSummary {
    fn from_iter<I: IntoIterator<Item = DeviceRunResult>>(iter: I) -> Self {
        let mut summary = RunSummary::default();
        summary.extend(iter);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> TargetAddress {
        s.parse().unwrap()
    }

    #[test]
    fn summary_totals_only_successful_downtime() {
        let summary: RunSummary = vec![
            DeviceRunResult::success(addr("10.0.0.1"), Vendor::Snom, 45),
            DeviceRunResult::failed(addr("10.0.0.2"), Vendor::Polycom, "login form not found"),
            DeviceRunResult::undetected(addr("10.0.0.3")),
            DeviceRunResult::success(addr("10.0.0.4"), Vendor::Grandstream, 30),
        ]
        .into_iter()
        .collect();

        assert_eq!(summary.total_downtime_secs, 75);
        assert_eq!(summary.results.len(), 4);
        assert_eq!(
            (summary.succeeded(), summary.failed(), summary.undetected()),
            (2, 1, 1)
        );
    }

    #[test]
    fn empty_run_has_zero_downtime() {
        let summary: RunSummary = std::iter::empty().collect();
        assert_eq!(summary, RunSummary::default());
    }
}
