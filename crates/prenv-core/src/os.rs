//! OS selector to provider image id lookup

use crate::error::ConfigError;

/// Supported OS selectors and their Vultr `os_id`
pub const OS_IDS: &[(&str, u32)] = &[
    ("ubuntu", 2284),
    ("ubuntu-24.04", 2284),
    ("ubuntu-22.04", 1743),
    ("debian", 2136),
    ("debian-12", 2136),
    ("rocky", 1869),
    ("alma", 1868),
];

/// Resolve an OS selector (case-insensitive) to an image id
pub fn os_id(selector: &str) -> Result<u32, ConfigError> {
    let wanted = selector.trim().to_ascii_lowercase();
    OS_IDS
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, id)| *id)
        .ok_or_else(|| ConfigError::InvalidOs {
            given: selector.to_string(),
            valid: OS_IDS
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_id_lookup() {
        assert_eq!(os_id("ubuntu").unwrap(), 2284);
        assert_eq!(os_id(" Debian ").unwrap(), 2136);
        assert_eq!(os_id("ubuntu-22.04").unwrap(), 1743);
    }

    #[test]
    fn test_unknown_os_lists_choices() {
        let err = os_id("windows").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("windows"));
        assert!(message.contains("ubuntu, ubuntu-24.04"));
    }
}
