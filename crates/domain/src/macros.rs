//! Macro for implementing Display and FromStr for status-like enums
//!
//! Plan tiers and timer states travel as lowercase strings between the
//! hosted store, the local cache and the UI. This macro keeps the two
//! directions of that conversion in one place.
//!
//! # Example
//!
//! ```rust
//! use ticktally_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Tier {
//!     Free,
//!     Pro,
//! }
//!
//! impl_domain_status_conversions!(Tier {
//!     Free => "free",
//!     Pro => "pro",
//! });
//!
//! assert_eq!(Tier::Pro.to_string(), "pro");
//! assert_eq!("FREE".parse::<Tier>().unwrap(), Tier::Free);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// Parsing is case-insensitive; output is always the literal given in the
/// mapping.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
