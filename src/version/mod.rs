//! Version normalization.
//!
//! Release versions uploaded to an index are free-form strings. This module
//! turns the ones that look like versions into comparable
//! [`NormalizedVersion`] values and reports everything else as
//! unparseable, which the ordering code treats as a dated release.

mod normalized;
mod suggest;

pub use normalized::{IrrationalVersionError, NormalizedVersion, PostDev, PreRelease, Suffix};
pub use suggest::suggest_normalized_version;

/// Turns a raw version string into a comparable version, if possible.
#[cfg_attr(test, mockall::automock)]
pub trait Normalize {
    fn normalize(&self, raw: &str) -> Option<NormalizedVersion>;
}

/// PEP 386 normalization: suggest a rational spelling, then parse it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verlib;

impl Normalize for Verlib {
    fn normalize(&self, raw: &str) -> Option<NormalizedVersion> {
        suggest_normalized_version(raw).and_then(|s| NormalizedVersion::parse(&s).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verlib_normalizes_suggestions() {
        let version = Verlib.normalize("1.0-beta2").unwrap();
        assert_eq!(version.to_string(), "1.0b2");
    }

    #[test]
    fn test_verlib_rejects_dates() {
        assert!(Verlib.normalize("2023-01-dev").is_none());
        assert!(Verlib.normalize("20120101").is_none());
    }

    #[test]
    fn test_verlib_orders_mixed_spellings() {
        let a = Verlib.normalize("v1.0").unwrap();
        let b = Verlib.normalize("1.0.post1").unwrap();
        let c = Verlib.normalize("1.1-alpha1").unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}
