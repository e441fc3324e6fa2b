//! # Target Addresses
//!
//! The input of a run is a plain text list with one phone per line. Each entry is an
//! IP address or hostname; the port is never part of it, since reachability is always
//! probed on the configured port and the consoles are always served over plain HTTP.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::credentials::Credential;
use crate::error::ConfigError;

/// A phone to reboot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetAddress(String);

impl TargetAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Root of the management console, e.g. `http://10.0.0.5/`.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&format!("http://{}/", self.0))
            .map_err(|_| ConfigError::InvalidTarget(self.0.clone()))
    }

    /// A page of the management console.
    pub fn page_url(&self, page: &str) -> Result<Url, ConfigError> {
        self.base_url()?
            .join(page)
            .map_err(|_| ConfigError::InvalidTarget(self.0.clone()))
    }

    /// Root URL with the credential embedded as HTTP basic auth userinfo.
    ///
    /// Reserved characters in the username or password are percent-encoded.
    pub fn url_with_credentials(&self, credential: &Credential) -> Result<Url, ConfigError> {
        let mut url = self.base_url()?;
        let invalid = || ConfigError::InvalidTarget(self.0.clone());
        url.set_username(&credential.username).map_err(|_| invalid())?;
        url.set_password(Some(&credential.password))
            .map_err(|_| invalid())?;
        Ok(url)
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TargetAddress {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ConfigError::InvalidTarget(s.to_string());
        if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(invalid());
        }
        let target = TargetAddress(trimmed.to_string());
        let url = target.base_url()?;
        // bare host only: the prober connects to this string as is
        let bare_host = url.port().is_none()
            && url.username().is_empty()
            && url.password().is_none()
            && url.query().is_none()
            && url.fragment().is_none()
            && url
                .host_str()
                .is_some_and(|host| host.eq_ignore_ascii_case(trimmed));
        if !bare_host {
            return Err(invalid());
        }
        Ok(target)
    }
}

/// Parses a target list: one address per line, blank lines and `#` comments skipped.
pub fn parse_list(text: &str) -> Result<Vec<TargetAddress>, ConfigError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::parse)
        .collect()
}

/// Reads and parses a target list file.
pub fn load_list(path: &std::path::Path) -> Result<Vec<TargetAddress>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_list(&text)
}
