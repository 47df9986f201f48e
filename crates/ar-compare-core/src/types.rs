//! Strong type definitions for AR Compare.
//!
//! Identifiers are newtypes so a product id cannot be confused with a storage
//! key or any other string at compile time.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// An opaque reference to an entry in the external product catalog.
///
/// The comparison state never checks that the id exists in the catalog, and
/// accepts any string, including the empty one.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({:?})", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for ProductId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<&ProductId> for ProductId {
    fn from(id: &ProductId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        let id = ProductId::new("xreal-air-2");
        assert_eq!(format!("{}", id), "xreal-air-2");
    }

    #[test]
    fn test_product_id_debug() {
        let id = ProductId::new("rayban-meta");
        assert_eq!(format!("{:?}", id), "ProductId(\"rayban-meta\")");
    }

    #[test]
    fn test_product_id_serializes_as_plain_string() {
        let id = ProductId::new("viture-one");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"viture-one\"");

        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_product_id_compares_with_str() {
        let id = ProductId::from("product-1");
        assert_eq!(id, "product-1");
        assert!(id != "product-2");
    }

    #[test]
    fn test_empty_product_id_is_accepted() {
        let id = ProductId::new("");
        assert_eq!(id.as_str(), "");
    }
}
