//! Core data types shared by the trainer and the prediction service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Spam,
    Ham,
}

impl Category {
    /// Parse a dataset category cell (`spam` / `ham`, case-insensitive)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "spam" => Some(Category::Spam),
            "ham" => Some(Category::Ham),
            _ => None,
        }
    }

    /// Integer label used for training: spam = 0, ham = 1
    pub fn label(self) -> u8 {
        match self {
            Category::Spam => 0,
            Category::Ham => 1,
        }
    }

    /// Inverse of [`Category::label`]. Any non-zero label is ham.
    pub fn from_label(label: u8) -> Self {
        if label == 0 {
            Category::Spam
        } else {
            Category::Ham
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Spam => "Spam",
            Category::Ham => "Ham",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the labeled dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// `None` when the category cell was empty or unrecognised
    pub category: Option<Category>,
    pub message: String,
}

impl Record {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category: Some(category),
            message: message.into(),
        }
    }
}

/// Result of classifying one message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub category: Category,
    pub is_spam: bool,
}

impl Prediction {
    pub fn from_label(label: u8) -> Self {
        let category = Category::from_label(label);
        Self {
            category,
            is_spam: category == Category::Spam,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("spam"), Some(Category::Spam));
        assert_eq!(Category::parse(" HAM "), Some(Category::Ham));
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("unknown"), None);
    }

    #[test]
    fn test_label_encoding() {
        assert_eq!(Category::Spam.label(), 0);
        assert_eq!(Category::Ham.label(), 1);
        assert_eq!(Category::from_label(0), Category::Spam);
        assert_eq!(Category::from_label(1), Category::Ham);
    }

    #[test]
    fn test_prediction_from_label() {
        let spam = Prediction::from_label(0);
        assert_eq!(spam.category, Category::Spam);
        assert!(spam.is_spam);

        let ham = Prediction::from_label(1);
        assert_eq!(ham.category.as_str(), "Ham");
        assert!(!ham.is_spam);
    }
}
