//! Serde helpers for the Clash document model.
//!
//! Small predicates used with `skip_serializing_if` so that default values
//! stay out of the rendered document.

/// Returns `true` if the boolean value is `false`.
///
/// Used with `#[serde(skip_serializing_if = "is_false")]` to omit false values.
#[inline]
pub fn is_false(b: &bool) -> bool {
    !*b
}
