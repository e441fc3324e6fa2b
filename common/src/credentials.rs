use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::vendor::Vendor;

/// Login for one vendor's management console.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Vendor name to credential mapping, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialTable {
    entries: BTreeMap<Vendor, Credential>,
}

impl Default for CredentialTable {
    /// Factory logins shipped on the phones.
    fn default() -> Self {
        let entries = BTreeMap::from([
            (Vendor::Grandstream, Credential::new("admin", "admin")),
            (Vendor::Snom, Credential::new("admin", "admin")),
            (Vendor::Polycom, Credential::new("Polycom", "456")),
        ]);
        Self { entries }
    }
}

impl CredentialTable {
    pub fn get(&self, vendor: Vendor) -> Option<&Credential> {
        self.entries.get(&vendor)
    }

    /// Overrides entries with the ones found in a TOML document such as
    ///
    /// ```toml
    /// [polycom]
    /// username = "Polycom"
    /// password = "1234"
    /// ```
    pub fn merge_toml(&mut self, text: &str, origin: &Path) -> Result<(), ConfigError> {
        let overrides: BTreeMap<Vendor, Credential> =
            toml::from_str(text).map_err(|source| ConfigError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        self.entries.extend(overrides);
        Ok(())
    }

    /// Defaults, overridden by `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        if let Some(path) = path {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            table.merge_toml(&text, path)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_every_vendor() {
        let table = CredentialTable::default();
        for vendor in Vendor::ALL {
            assert!(table.get(vendor).is_some(), "missing {vendor}");
        }
        assert_eq!(table.get(Vendor::Polycom).unwrap().password, "456");
    }

    #[test]
    fn file_overrides_only_listed_vendors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[snom]\nusername = \"ops\"\npassword = \"s3cret\"").unwrap();

        let table = CredentialTable::load(Some(file.path())).unwrap();

        assert_eq!(table.get(Vendor::Snom).unwrap(), &Credential::new("ops", "s3cret"));
        assert_eq!(
            table.get(Vendor::Grandstream).unwrap(),
            &Credential::new("admin", "admin")
        );
    }

    #[test]
    fn unknown_vendor_section_is_a_parse_error() {
        let mut table = CredentialTable::default();
        let err = table
            .merge_toml("[cisco]\nusername = \"a\"\npassword = \"b\"", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn debug_never_shows_password() {
        let shown = format!("{:?}", Credential::new("admin", "hunter2"));
        assert!(!shown.contains("hunter2"));
    }
}
