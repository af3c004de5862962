//! Integer identifiers handed out by the API.
//!
//! Each entity gets its own wrapper so a product ID cannot be passed where an
//! order ID is expected.

/// Declare an `i64` identifier newtype.
///
/// The generated type serializes as a bare integer, orders numerically and
/// parses from text with surrounding whitespace ignored.
///
/// ```rust
/// # use candy_market_core::define_id;
/// define_id!(CouponId);
///
/// let id: CouponId = " 9 ".parse().unwrap();
/// assert_eq!(id.as_i64(), 9);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&ProductId::new(42)).unwrap();
        assert_eq!(json, "42");

        let parsed: OrderId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.as_i64(), 7);
    }

    #[test]
    fn test_id_from_str_trims_whitespace() {
        let id: ProductId = " 12 ".parse().unwrap();
        assert_eq!(id, ProductId::new(12));
        assert!("abc".parse::<ProductId>().is_err());
    }
}
