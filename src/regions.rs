//! Federative unit codes and display names

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::app_data::{app_data, RegionInfo};

/// Two-letter code of a Brazilian federative unit ("SP", "RJ", ...).
///
/// A code is only an identifier: it may or may not have events in the
/// catalog, and it is compared exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateCode(String);

impl StateCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Parse user input: trims and uppercases, rejects blank input
    pub fn parse(input: &str) -> Option<Self> {
        let code = input.trim();
        if code.is_empty() {
            None
        } else {
            Some(Self(code.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name, falling back to the code itself for unknown units
    pub fn display_name(&self) -> &str {
        name(&self.0).unwrap_or(&self.0)
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StateCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StateCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// All 27 units in table order
pub fn all() -> &'static [RegionInfo] {
    &app_data().regions
}

/// Look up the display name for a code
pub fn name(code: &str) -> Option<&'static str> {
    all()
        .iter()
        .find(|r| r.code == code)
        .map(|r| r.name.as_str())
}

/// Label used by the state dropdown: "São Paulo (SP)"
pub fn dropdown_label(code: &StateCode) -> String {
    format!("{} ({})", code.display_name(), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        assert_eq!(name("SP"), Some("São Paulo"));
        assert_eq!(name("DF"), Some("Distrito Federal"));
        assert_eq!(name("XX"), None);
    }

    #[test]
    fn test_unknown_code_displays_itself() {
        assert_eq!(StateCode::new("ZZ").display_name(), "ZZ");
        assert_eq!(StateCode::new("RJ").display_name(), "Rio de Janeiro");
    }

    #[test]
    fn test_parse_normalizes_input() {
        assert_eq!(StateCode::parse(" sp "), Some(StateCode::new("SP")));
        assert_eq!(StateCode::parse("   "), None);
        assert_eq!(StateCode::parse(""), None);
    }

    #[test]
    fn test_dropdown_label() {
        assert_eq!(dropdown_label(&StateCode::new("MG")), "Minas Gerais (MG)");
    }
}
