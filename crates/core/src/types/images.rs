//! Ordered product image list.
//!
//! The sortable image strip on the product form emits a complete new order on
//! every drop. [`ImageList::replace_with`] only accepts that order if it is a
//! permutation of the current list, so a malformed emission can never add or
//! silently drop an image.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a proposed image order is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// The proposed order has a different number of entries.
    #[error("expected {expected} images, got {actual}")]
    LengthMismatch {
        /// Number of images currently held.
        expected: usize,
        /// Number of images in the proposed order.
        actual: usize,
    },
    /// The proposed order contains a URL that is not in the list, or repeats
    /// one more often than the list does.
    #[error("image not in current list: {0}")]
    UnknownImage(String),
}

/// Ordered list of hosted image URLs.
///
/// ```
/// use backoffice_core::ImageList;
///
/// let mut images = ImageList::from(vec!["a.jpg".to_string(), "b.jpg".to_string()]);
/// images.append(vec!["c.jpg".to_string()]);
/// images
///     .replace_with(vec!["c.jpg".into(), "a.jpg".into(), "b.jpg".into()])
///     .unwrap();
/// assert_eq!(images.as_slice(), ["c.jpg", "a.jpg", "b.jpg"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageList(Vec<String>);

impl ImageList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append newly uploaded links after the existing images.
    pub fn append<I>(&mut self, links: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.0.extend(links);
    }

    /// Replace the order with `proposed`.
    ///
    /// The list is left untouched unless `proposed` holds exactly the same
    /// URLs (including repeats) as the current list.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError`] if `proposed` is not a permutation of the
    /// current list.
    pub fn replace_with(&mut self, proposed: Vec<String>) -> Result<(), ReorderError> {
        if proposed.len() != self.0.len() {
            return Err(ReorderError::LengthMismatch {
                expected: self.0.len(),
                actual: proposed.len(),
            });
        }

        let mut remaining: HashMap<&str, usize> = HashMap::with_capacity(self.0.len());
        for url in &self.0 {
            *remaining.entry(url.as_str()).or_insert(0) += 1;
        }
        for url in &proposed {
            match remaining.get_mut(url.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return Err(ReorderError::UnknownImage(url.clone())),
            }
        }

        self.0 = proposed;
        Ok(())
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The images in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the images in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Consume the list, returning the URLs in order.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for ImageList {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

impl<'a> IntoIterator for &'a ImageList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
