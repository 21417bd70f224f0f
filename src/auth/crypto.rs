//! # Cryptographic Utilities
//!
//! Secret comparison that does not leak timing.

use subtle::ConstantTimeEq;

/// Constant-time comparison of two byte slices
///
/// Slices of different length compare unequal without inspecting contents.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Constant-time comparison of two strings
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}
