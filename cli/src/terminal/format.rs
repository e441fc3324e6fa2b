use crate::terminal::colors;
use colored::*;
use rebootr_common::report::{DeviceRunResult, DeviceStatus};
use rebootr_common::utils::duration::format_duration;

pub type Detail = (String, ColoredString);

pub fn status_to_detail(status: &DeviceStatus) -> Detail {
    let value = match status {
        DeviceStatus::Success => "rebooted".color(colors::SUCCESS).bold(),
        DeviceStatus::Failed { .. } => "failed".color(colors::FAILURE).bold(),
        DeviceStatus::Undetected => "undetected".color(colors::UNDETECTED),
    };
    (String::from("Status"), value)
}

/// Tree rows describing one device.
pub fn result_to_details(result: &DeviceRunResult) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();

    if let Some(vendor) = result.vendor {
        details.push((String::from("Vendor"), vendor.label().color(colors::VENDOR)));
    }

    details.push(status_to_detail(&result.status));

    if let Some(secs) = result.downtime_secs {
        details.push((String::from("Down"), format_duration(secs).normal()));
    }

    if let DeviceStatus::Failed { reason } = &result.status {
        details.push((String::from("Reason"), reason.as_str().color(colors::FAILURE)));
    }

    details
}

pub fn reachability(open: bool) -> ColoredString {
    if open {
        "open".color(colors::SUCCESS).bold()
    } else {
        "closed".color(colors::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebootr_common::network::target::TargetAddress;
    use rebootr_common::vendor::Vendor;

    fn address() -> TargetAddress {
        "10.0.0.5".parse().unwrap()
    }

    fn keys(details: &[Detail]) -> Vec<&str> {
        details.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn success_shows_vendor_and_downtime() {
        let result = DeviceRunResult::success(address(), Vendor::Snom, 45);
        let details = result_to_details(&result);
        assert_eq!(keys(&details), ["Vendor", "Status", "Down"]);
        assert!(details[2].1.to_string().contains("45 second"));
    }

    #[test]
    fn failure_carries_reason() {
        let result = DeviceRunResult::failed(address(), Vendor::Polycom, "login rejected");
        let details = result_to_details(&result);
        assert_eq!(keys(&details), ["Vendor", "Status", "Reason"]);
    }

    #[test]
    fn undetected_only_has_status() {
        let details = result_to_details(&DeviceRunResult::undetected(address()));
        assert_eq!(keys(&details), ["Status"]);
    }
}
