use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// The phone makes rebootr knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Grandstream,
    Snom,
    Polycom,
}

impl Vendor {
    pub const ALL: [Vendor; 3] = [Vendor::Grandstream, Vendor::Snom, Vendor::Polycom];

    pub fn name(&self) -> &'static str {
        match self {
            Vendor::Grandstream => "grandstream",
            Vendor::Snom => "snom",
            Vendor::Polycom => "polycom",
        }
    }

    /// Human facing name, as printed in progress lines.
    pub fn label(&self) -> &'static str {
        match self {
            Vendor::Grandstream => "Grandstream",
            Vendor::Snom => "Snom",
            Vendor::Polycom => "Polycom",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Vendor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Vendor::ALL
            .into_iter()
            .find(|vendor| vendor.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownVendor(s.to_string()))
    }
}

/// Rejects empty orders and orders naming a vendor twice, since trying the same
/// console twice against one address can never change the outcome.
pub fn check_order(order: &[Vendor]) -> Result<(), ConfigError> {
    if order.is_empty() {
        return Err(ConfigError::EmptyOrder);
    }
    for (i, vendor) in order.iter().enumerate() {
        if order[..i].contains(vendor) {
            return Err(ConfigError::DuplicateVendor(*vendor));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Snom".parse::<Vendor>().unwrap(), Vendor::Snom);
        assert_eq!(" POLYCOM ".parse::<Vendor>().unwrap(), Vendor::Polycom);
    }

    #[test]
    fn rejects_unknown_vendor() {
        let err = "cisco".parse::<Vendor>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVendor(name) if name == "cisco"));
    }

    #[test]
    fn order_accepts_any_sequence_of_distinct_vendors() {
        assert!(check_order(&[Vendor::Polycom, Vendor::Grandstream]).is_ok());
        assert!(check_order(&Vendor::ALL).is_ok());
    }

    #[test]
    fn order_rejects_duplicates_and_empty() {
        assert!(matches!(
            check_order(&[Vendor::Snom, Vendor::Polycom, Vendor::Snom]),
            Err(ConfigError::DuplicateVendor(Vendor::Snom))
        ));
        assert!(matches!(check_order(&[]), Err(ConfigError::EmptyOrder)));
    }
}
