//! Resolving selected ids against the product catalog.
//!
//! The store only knows ids. Rendering a comparison table needs the product
//! records, which live in an external catalog; this module joins the two
//! without the store ever touching the catalog.

use std::collections::{BTreeMap, HashMap};

use ar_compare_core::{ComparisonState, ProductId};

/// A source of product records.
pub trait ProductCatalog {
    type Product;

    /// The record for `id`, if the catalog knows it.
    fn lookup(&self, id: &ProductId) -> Option<Self::Product>;
}

impl<P: Clone> ProductCatalog for HashMap<ProductId, P> {
    type Product = P;

    fn lookup(&self, id: &ProductId) -> Option<P> {
        self.get(id).cloned()
    }
}

impl<P: Clone> ProductCatalog for BTreeMap<ProductId, P> {
    type Product = P;

    fn lookup(&self, id: &ProductId) -> Option<P> {
        self.get(id).cloned()
    }
}

/// A selected item joined with its catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem<P> {
    pub product_id: ProductId,
    pub position: usize,
    /// `None` when the catalog no longer has the product.
    pub product: Option<P>,
}

/// Resolve every selected item in position order.
///
/// Unknown ids are kept with `product: None` so the table keeps one column
/// per selection.
pub fn resolve_selection<C: ProductCatalog>(
    state: &ComparisonState,
    catalog: &C,
) -> Vec<ResolvedItem<C::Product>> {
    state
        .items()
        .iter()
        .map(|item| ResolvedItem {
            product_id: item.product_id.clone(),
            position: item.position,
            product: catalog.lookup(&item.product_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Glasses {
        name: &'static str,
        weight_grams: u32,
    }

    fn catalog() -> HashMap<ProductId, Glasses> {
        HashMap::from([
            (
                ProductId::from("xreal-air-2"),
                Glasses {
                    name: "XREAL Air 2",
                    weight_grams: 72,
                },
            ),
            (
                ProductId::from("viture-one"),
                Glasses {
                    name: "VITURE One",
                    weight_grams: 78,
                },
            ),
        ])
    }

    #[test]
    fn test_resolve_in_position_order() {
        let mut state = ComparisonState::default();
        state.add_item("viture-one".into());
        state.add_item("xreal-air-2".into());

        let resolved = resolve_selection(&state, &catalog());
        let names: Vec<_> = resolved
            .iter()
            .map(|r| r.product.as_ref().map(|p| p.name))
            .collect();
        assert_eq!(names, vec![Some("VITURE One"), Some("XREAL Air 2")]);
        assert_eq!(resolved[1].position, 1);
        assert_eq!(resolved[0].product.as_ref().map(|p| p.weight_grams), Some(78));
    }

    #[test]
    fn test_unknown_ids_are_kept() {
        let mut state = ComparisonState::default();
        state.add_item("discontinued".into());
        state.add_item("xreal-air-2".into());

        let resolved = resolve_selection(&state, &catalog());
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].product_id, "discontinued");
        assert!(resolved[0].product.is_none());
        assert!(resolved[1].product.is_some());
    }
}
