//! Purchase-order qualification rules.
//!
//! An order triggers a supplier purchase-order email only when every line
//! item ships from the designated drop-ship warehouse, resolves to an
//! allow-listed supplier, the destination country matches, and all items
//! resolve to the *same* supplier. The rule parameters live in one versioned
//! [`RuleSet`] so business-rule changes are edits to data, not new handler
//! copies.

use serde::Serialize;

/// Warehouse and supplier resolved for a single line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResolution {
    /// Assigned fulfillment location name, or a sentinel
    /// ("Unknown Warehouse") when resolution degraded.
    pub warehouse: String,
    /// Supplier name from product metadata, or a sentinel
    /// ("Unknown Supplier" / "No Supplier Found") when resolution degraded.
    pub supplier: String,
}

/// The versioned parameters of the qualification predicate.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    /// Monotonically bumped when the business rules change.
    pub version: u32,
    /// Required shipping country (full name, as sent by the webhook).
    pub country: String,
    /// Suppliers for which purchase-order emails are dispatched.
    pub allowed_suppliers: Vec<String>,
    /// The designated drop-ship warehouse name.
    pub dropship_warehouse: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            version: 2,
            country: "Canada".to_string(),
            allowed_suppliers: vec!["Best Buy".to_string(), "Medline Canada".to_string()],
            dropship_warehouse: "A - Dropship (Abbey Lane)".to_string(),
        }
    }
}

/// Why an order failed qualification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum Disqualification {
    /// The order has no line items.
    #[error("order has no line items")]
    NoItems,
    /// Shipping country did not match the rule set.
    #[error("shipping country is {found}")]
    Country { found: String },
    /// A line item's supplier is not on the allow-list.
    #[error("supplier {found} is not allow-listed")]
    Supplier { found: String },
    /// A line item is not assigned to the drop-ship warehouse.
    #[error("warehouse {found} is not the drop-ship warehouse")]
    Warehouse { found: String },
    /// Items resolved to more than one supplier.
    #[error("items resolve to more than one supplier")]
    MixedSuppliers,
}

/// Outcome of evaluating the rule set against a resolved order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Qualification {
    /// Every item passed and all items share this supplier.
    Qualified { supplier: String },
    /// At least one predicate failed.
    Rejected(Disqualification),
}

impl Qualification {
    /// The routed supplier name, when qualified.
    #[must_use]
    pub fn supplier(&self) -> Option<&str> {
        match self {
            Self::Qualified { supplier } => Some(supplier),
            Self::Rejected(_) => None,
        }
    }
}

impl RuleSet {
    /// Evaluate the qualification predicate.
    ///
    /// Per-item checks short-circuit on the first disqualification;
    /// supplier uniqueness is only decidable after every item has resolved,
    /// so it is checked last.
    #[must_use]
    pub fn qualify(&self, shipping_country: &str, items: &[ItemResolution]) -> Qualification {
        if items.is_empty() {
            return Qualification::Rejected(Disqualification::NoItems);
        }

        if shipping_country != self.country {
            return Qualification::Rejected(Disqualification::Country {
                found: shipping_country.to_string(),
            });
        }

        for item in items {
            if !self.allowed_suppliers.iter().any(|s| s == &item.supplier) {
                return Qualification::Rejected(Disqualification::Supplier {
                    found: item.supplier.clone(),
                });
            }
            if item.warehouse != self.dropship_warehouse {
                return Qualification::Rejected(Disqualification::Warehouse {
                    found: item.warehouse.clone(),
                });
            }
        }

        // All items passed individually; the order still only qualifies if
        // they route to a single supplier.
        let mut suppliers = items.iter().map(|i| i.supplier.as_str());
        let first = suppliers.next().unwrap_or_default();
        if suppliers.any(|s| s != first) {
            return Qualification::Rejected(Disqualification::MixedSuppliers);
        }

        Qualification::Qualified {
            supplier: first.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(warehouse: &str, supplier: &str) -> ItemResolution {
        ItemResolution {
            warehouse: warehouse.to_string(),
            supplier: supplier.to_string(),
        }
    }

    fn dropship(supplier: &str) -> ItemResolution {
        item("A - Dropship (Abbey Lane)", supplier)
    }

    #[test]
    fn test_single_item_qualifies() {
        let rules = RuleSet::default();
        let result = rules.qualify("Canada", &[dropship("Best Buy")]);
        assert_eq!(
            result,
            Qualification::Qualified {
                supplier: "Best Buy".to_string()
            }
        );
    }

    #[test]
    fn test_country_gate_is_absolute() {
        let rules = RuleSet::default();
        let result = rules.qualify("United States", &[dropship("Best Buy")]);
        assert_eq!(
            result,
            Qualification::Rejected(Disqualification::Country {
                found: "United States".to_string()
            })
        );
    }

    #[test]
    fn test_mixed_suppliers_never_qualify() {
        let rules = RuleSet::default();
        let result = rules.qualify(
            "Canada",
            &[dropship("Best Buy"), dropship("Medline Canada")],
        );
        assert_eq!(result, Qualification::Rejected(Disqualification::MixedSuppliers));
    }

    #[test]
    fn test_multi_item_same_supplier_qualifies() {
        let rules = RuleSet::default();
        let result = rules.qualify(
            "Canada",
            &[dropship("Medline Canada"), dropship("Medline Canada")],
        );
        assert_eq!(
            result,
            Qualification::Qualified {
                supplier: "Medline Canada".to_string()
            }
        );
    }

    #[test]
    fn test_unlisted_supplier_rejected() {
        let rules = RuleSet::default();
        let result = rules.qualify("Canada", &[dropship("Acme Wholesale")]);
        assert_eq!(
            result,
            Qualification::Rejected(Disqualification::Supplier {
                found: "Acme Wholesale".to_string()
            })
        );
    }

    #[test]
    fn test_wrong_warehouse_rejected() {
        let rules = RuleSet::default();
        let result = rules.qualify("Canada", &[item("Main Warehouse", "Best Buy")]);
        assert_eq!(
            result,
            Qualification::Rejected(Disqualification::Warehouse {
                found: "Main Warehouse".to_string()
            })
        );
    }

    #[test]
    fn test_degraded_sentinel_fails_qualification() {
        let rules = RuleSet::default();
        let result = rules.qualify("Canada", &[item("Unknown Warehouse", "Unknown Supplier")]);
        assert!(matches!(result, Qualification::Rejected(_)));
    }

    #[test]
    fn test_empty_order_rejected() {
        let rules = RuleSet::default();
        assert_eq!(
            rules.qualify("Canada", &[]),
            Qualification::Rejected(Disqualification::NoItems)
        );
    }

    #[test]
    fn test_one_bad_item_disqualifies_whole_order() {
        let rules = RuleSet::default();
        let result = rules.qualify(
            "Canada",
            &[dropship("Best Buy"), item("Main Warehouse", "Best Buy")],
        );
        assert_eq!(
            result,
            Qualification::Rejected(Disqualification::Warehouse {
                found: "Main Warehouse".to_string()
            })
        );
    }
}
