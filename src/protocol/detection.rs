//! Detection results delivered to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::XywhBox;

// ============================================================================
// Category
// ============================================================================

/// Object class reported by the detector.
///
/// The detector may send a label or a numeric class id. Whole-number floats
/// such as `2.0` decode as [`Category::Id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "RawCategory")]
pub enum Category {
    /// Numeric class id.
    Id(i64),
    /// Non-integral numeric class.
    Number(f64),
    /// Class label.
    Label(String),
}

/// Wire form before whole-number floats are folded into ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Int(i64),
    Float(f64),
    Label(String),
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        match raw {
            RawCategory::Int(id) => Self::Id(id),
            RawCategory::Float(n)
                if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 =>
            {
                Self::Id(n as i64)
            }
            RawCategory::Float(n) => Self::Number(n),
            RawCategory::Label(label) => Self::Label(label),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<i64> for Category {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

// ============================================================================
// Detection
// ============================================================================

/// One detected object. Immutable once decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    category: Category,
    score: f64,
    bbox: XywhBox,
}

impl Detection {
    /// Creates a detection. Only the reply decoder builds these.
    pub(crate) fn new(category: Category, score: f64, bbox: XywhBox) -> Self {
        Self {
            category,
            score,
            bbox,
        }
    }

    /// Returns the object class.
    #[inline]
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the confidence in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the box in origin-plus-extent form.
    #[inline]
    #[must_use]
    pub fn bbox(&self) -> XywhBox {
        self.bbox
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_untagged() {
        let label: Category = serde_json::from_str("\"person\"").unwrap();
        let id: Category = serde_json::from_str("3").unwrap();

        assert_eq!(label, Category::from("person"));
        assert_eq!(id, Category::Id(3));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Id(7).to_string(), "7");
        assert_eq!(Category::from("car").to_string(), "car");
    }

    #[test]
    fn test_float_category() {
        let whole: Category = serde_json::from_str("2.0").unwrap();
        let fractional: Category = serde_json::from_str("1.5").unwrap();

        assert_eq!(whole, Category::Id(2));
        assert_eq!(fractional, Category::Number(1.5));
        assert_eq!(fractional.to_string(), "1.5");
    }

    #[test]
    fn test_non_scalar_category_rejected() {
        assert!(serde_json::from_str::<Category>("[1]").is_err());
        assert!(serde_json::from_str::<Category>("null").is_err());
    }
}
