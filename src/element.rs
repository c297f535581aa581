//! Storage element types for sample matrices.
//!
//! Forest training reads every value as `f64`, but the backing buffer does
//! not have to store 8 bytes per cell. A matrix over `f32` halves the
//! footprint, and the byte types cut it to one eighth for data that is
//! integer-coded to begin with (genotype calls, small factor codes).
//! [`Element::from_f64`] is the gatekeeper: it refuses values the narrower
//! type cannot represent, so a lossy store is an explicit error at write time
//! rather than silent corruption.

use std::cmp::Ordering;

/// A value storable in a [`SampleMatrix`](crate::SampleMatrix).
///
/// Implemented for `f64` (the default), `f32`, `u8`, and `i8`. The float
/// types represent missing values as NaN; the byte types have no missing
/// representation and report nothing as missing.
pub trait Element: Copy + std::fmt::Debug + Default + Send + Sync + 'static {
    /// Converts a double-precision value into this storage type, or `None`
    /// if the value cannot be represented.
    fn from_f64(value: f64) -> Option<Self>;

    /// Widens back to `f64` for consumers that work in double precision.
    fn to_f64(self) -> f64;

    /// Total ordering over stored values. For floats this is IEEE
    /// `totalOrder`, which places NaN after every finite value and infinity.
    fn total_cmp(&self, other: &Self) -> Ordering;

    /// `true` if this value encodes a missing observation.
    fn is_missing(self) -> bool;

    /// The missing-value sentinel, if this type has one.
    fn missing() -> Option<Self>;
}

impl Element for f64 {
    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        Some(value)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }

    #[inline]
    fn is_missing(self) -> bool {
        self.is_nan()
    }

    #[inline]
    fn missing() -> Option<Self> {
        Some(f64::NAN)
    }
}

impl Element for f32 {
    /// Narrows with round-to-nearest; values beyond `f32` range become
    /// infinite, matching a plain numeric cast. NaN stays NaN.
    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        Some(value as f32)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        f32::total_cmp(self, other)
    }

    #[inline]
    fn is_missing(self) -> bool {
        self.is_nan()
    }

    #[inline]
    fn missing() -> Option<Self> {
        Some(f32::NAN)
    }
}

impl Element for u8 {
    /// Accepts whole numbers in `0..=255` only.
    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        if value < f64::from(u8::MIN) || value > f64::from(u8::MAX) {
            return None;
        }
        Some(value as u8)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }

    #[inline]
    fn is_missing(self) -> bool {
        false
    }

    #[inline]
    fn missing() -> Option<Self> {
        None
    }
}

impl Element for i8 {
    /// Accepts whole numbers in `-128..=127` only.
    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        if value < f64::from(i8::MIN) || value > f64::from(i8::MAX) {
            return None;
        }
        Some(value as i8)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(self, other)
    }

    #[inline]
    fn is_missing(self) -> bool {
        false
    }

    #[inline]
    fn missing() -> Option<Self> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_round_trips_unchanged() {
        assert_eq!(f64::from_f64(1.5), Some(1.5));
        assert_eq!(Element::to_f64(2.25f64), 2.25);
        let missing = f64::missing().unwrap();
        assert!(missing.is_missing());
    }

    #[test]
    fn f32_narrowing_follows_cast_semantics() {
        assert_eq!(f32::from_f64(1.5), Some(1.5f32));
        // Beyond f32 range: saturates to infinity rather than failing.
        assert_eq!(f32::from_f64(1e300), Some(f32::INFINITY));
        assert!(f32::from_f64(f64::NAN).unwrap().is_nan());
    }

    #[test]
    fn u8_rejects_unrepresentable_values() {
        assert_eq!(u8::from_f64(0.0), Some(0));
        assert_eq!(u8::from_f64(255.0), Some(255));
        assert_eq!(u8::from_f64(256.0), None);
        assert_eq!(u8::from_f64(-1.0), None);
        assert_eq!(u8::from_f64(3.5), None);
        assert_eq!(u8::from_f64(f64::NAN), None);
        assert_eq!(u8::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn i8_covers_the_signed_byte_range() {
        assert_eq!(i8::from_f64(-128.0), Some(-128));
        assert_eq!(i8::from_f64(127.0), Some(127));
        assert_eq!(i8::from_f64(-129.0), None);
        assert_eq!(i8::from_f64(128.0), None);
    }

    #[test]
    fn byte_types_have_no_missing_sentinel() {
        assert_eq!(u8::missing(), None);
        assert_eq!(i8::missing(), None);
        assert!(!Element::is_missing(0u8));
    }

    #[test]
    fn total_cmp_orders_nan_last() {
        let mut values = [f64::NAN, 2.0, f64::INFINITY, -1.0];
        values.sort_by(|a, b| Element::total_cmp(a, b));
        assert_eq!(&values[..3], &[-1.0, 2.0, f64::INFINITY]);
        assert!(values[3].is_nan());
    }
}
