//! Account email addresses.
//!
//! Only the shape is checked locally: one `@` with something on both sides
//! and no whitespace. The server stores addresses as plain strings and
//! accepts domains such as `tienda.local`, so no stricter rules apply here.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why a string was refused as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("el correo es obligatorio")]
    Empty,

    #[error("el correo no puede superar {max} caracteres")]
    TooLong { max: usize },

    #[error("el correo no puede contener espacios")]
    Whitespace,

    /// Not exactly one `@`, or nothing before or after it.
    #[error("el correo debe tener la forma usuario@dominio")]
    Malformed,
}

/// An account email, as sent in credentials and returned in identities.
///
/// ```
/// use candy_market_core::Email;
///
/// assert!(Email::parse("ana@dulces.co").is_ok());
/// assert!(Email::parse("admin@tienda.local").is_ok());
/// assert!(Email::parse("ana@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 254;

    /// Validate the shape of an address. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let address = input.trim();
        if address.is_empty() {
            return Err(EmailError::Empty);
        }
        if address.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if address.contains(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        match address.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() && !domain.contains('@') => {
                Ok(Self(address.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_and_local_domains() {
        for address in ["ana@example.com", "ana.maria+dulces@correo.co", "admin@tienda.local", "a@b"] {
            assert!(Email::parse(address).is_ok(), "{address} should parse");
        }
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let email = Email::parse("  ana@example.com\n").unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("ana maria@example.com"), Err(EmailError::Whitespace));
        for address in ["sin-arroba", "@example.com", "ana@", "ana@@example.com", "a@b@c"] {
            assert_eq!(Email::parse(address), Err(EmailError::Malformed), "{address}");
        }
    }

    #[test]
    fn test_rejects_overlong_address() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { max: 254 })));
    }

    #[test]
    fn test_domain() {
        let email: Email = "ana@dulces.co".parse().unwrap();
        assert_eq!(email.domain(), "dulces.co");
        assert_eq!(email.to_string(), "ana@dulces.co");
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let email = Email::parse("ana@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"ana@example.com\"");
        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
    }
}
