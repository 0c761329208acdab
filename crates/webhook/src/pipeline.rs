//! Order processing pipeline (phase two of webhook handling).
//!
//! Runs detached from the HTTP response: resolve each line item's warehouse
//! and supplier, evaluate the qualification rules, consult the risk and
//! address gates, dispatch the appropriate email, and tag the order.
//!
//! Enrichment is best-effort. A failed Admin API lookup degrades the item to
//! a sentinel value ("Unknown Warehouse" / "Unknown Supplier") that fails
//! qualification rather than aborting the pipeline, and gate failures
//! degrade to the permissive verdict so a flaky side service never blocks a
//! purchase order.

use jarvis_core::rules::{ItemResolution, Qualification};
use jarvis_core::{Order, ProductDetail, ShippingDetails};
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::error::AppError;
use crate::services::AddressIssue;
use crate::shopify::types::FulfillmentOrder;
use crate::state::AppState;

/// Tag appended to an order after its purchase order is dispatched.
///
/// Doubles as the idempotency marker: a redelivered payload that already
/// carries the tag is skipped.
pub const ORDERED_TAG: &str = "JARVIS - Ordered";

/// Risk scores strictly above this threshold route to manual review.
const RISK_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// Which email a qualified order receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Supplier purchase order, followed by the order tag.
    Standard,
    /// High-risk review email; no tag.
    Risk,
    /// Address-warning review email; no tag.
    Warning,
}

/// Pick the email route for a qualified order.
///
/// Risk outranks the address warning when both gates fire.
#[must_use]
pub fn decide_route(risk_score: Decimal, address_issue: AddressIssue) -> Route {
    if risk_score > RISK_THRESHOLD {
        Route::Risk
    } else if address_issue == AddressIssue::Warning {
        Route::Warning
    } else {
        Route::Standard
    }
}

/// Spawn order processing as a detached task.
///
/// The webhook response has already been sent; failures here are logged and
/// reported to Sentry, never surfaced to Shopify.
pub fn spawn_processing(state: AppState, order: Order) {
    tokio::spawn(async move {
        let order_id = order.id;
        if let Err(e) = process_order(&state, order).await {
            sentry::capture_error(&e);
            error!(order_id = %order_id, error = %e, "Order processing failed");
        }
    });
}

/// Process one order end to end.
///
/// # Errors
///
/// Returns error if a qualified order's email dispatch fails. Enrichment
/// and gate failures degrade instead of erroring.
#[instrument(skip(state, order), fields(order_id = %order.id, order_name = %order.name))]
pub async fn process_order(state: &AppState, order: Order) -> Result<(), AppError> {
    // Redelivery guard: the tag is written after a successful dispatch, so
    // its presence means this order was already handled.
    if order.has_tag(ORDERED_TAG) {
        info!("Order already tagged, skipping");
        return Ok(());
    }

    let shipping = ShippingDetails::from_order(&order);
    let products: Vec<ProductDetail> = order
        .line_items
        .iter()
        .map(ProductDetail::from_line_item)
        .collect();

    let items = resolve_items(state, &order).await;

    let qualification = state
        .rules()
        .qualify(&order.shipping_address.country, &items);

    let supplier = match qualification {
        Qualification::Qualified { ref supplier } => supplier.clone(),
        Qualification::Rejected(reason) => {
            info!(reason = %reason, "Order did not qualify for a purchase order");
            return Ok(());
        }
    };

    let risk_score = fetch_risk_score(state, order.id).await;
    let address_issue = fetch_address_issue(state, order.id).await;
    let route = decide_route(risk_score, address_issue);

    let notifications = &state.config().notifications;
    match route {
        Route::Standard => {
            state
                .email()
                .send_purchase_order(
                    &notifications.po_recipients,
                    &supplier,
                    &notifications.account_number,
                    &shipping,
                    &products,
                )
                .await?;
            info!(supplier = %supplier, "Purchase order dispatched");

            // The email went out; a failed tag update only costs idempotency
            // on redelivery, so log it rather than failing the pipeline.
            if let Err(e) = state
                .shopify()
                .add_order_tag(order.id, &order.tags, ORDERED_TAG)
                .await
            {
                sentry::capture_error(&e);
                error!(error = %e, "Failed to tag order after dispatch");
            }
        }
        Route::Risk => {
            state
                .email()
                .send_risk_alert(&notifications.risk_recipients, risk_score, &shipping, &products)
                .await?;
            warn!(risk_score = %risk_score, "High-risk order routed to review");
        }
        Route::Warning => {
            state
                .email()
                .send_address_warning(&notifications.warning_recipients, &shipping, &products)
                .await?;
            warn!("Address warning, order routed to review");
        }
    }

    Ok(())
}

/// Resolve the warehouse and supplier for every line item.
///
/// The fulfillment orders are fetched once per order; each item then shares
/// the resolved assigned location.
async fn resolve_items(state: &AppState, order: &Order) -> Vec<ItemResolution> {
    let warehouse = resolve_warehouse(state, order).await;

    let mut items = Vec::with_capacity(order.line_items.len());
    for item in &order.line_items {
        let supplier = resolve_supplier(state, item.product_id, item.vendor.as_deref()).await;
        items.push(ItemResolution {
            warehouse: warehouse.clone(),
            supplier,
        });
    }
    items
}

/// Resolve the order's fulfillment warehouse name.
///
/// Fallback chain: assigned location name on the first fulfillment order,
/// then a location lookup by ID, then "{vendor} (Vendor Fulfilled)", then
/// the first shipping line title. Any fetch error short-circuits to
/// "Unknown Warehouse".
async fn resolve_warehouse(state: &AppState, order: &Order) -> String {
    let fulfillment_orders = match state.shopify().get_fulfillment_orders(order.id).await {
        Ok(orders) => orders,
        Err(e) => {
            warn!(error = %e, "Fulfillment order fetch failed");
            return "Unknown Warehouse".to_string();
        }
    };

    if let Some(first) = fulfillment_orders.first() {
        if let Some(name) = assigned_location_name(first) {
            return name;
        }
        if let Some(location_id) = first.assigned_location_id {
            match state.shopify().get_location_name(location_id).await {
                Ok(name) => return name,
                Err(e) => {
                    warn!(error = %e, location_id = %location_id, "Location lookup failed");
                    return "Unknown Warehouse".to_string();
                }
            }
        }
    }

    if let Some(vendor) = order
        .line_items
        .iter()
        .find_map(|item| item.vendor.as_deref())
    {
        return format!("{vendor} (Vendor Fulfilled)");
    }

    order
        .shipping_lines
        .first()
        .map_or_else(|| "Unknown Warehouse".to_string(), |line| line.title.clone())
}

fn assigned_location_name(fulfillment_order: &FulfillmentOrder) -> Option<String> {
    fulfillment_order
        .assigned_location
        .as_ref()
        .and_then(|location| location.name.clone())
        .filter(|name| !name.is_empty())
}

/// Resolve a line item's supplier.
///
/// A metafield with key "supplier" (or in the "custom" namespace) wins, then
/// the item's vendor, then "No Supplier Found". A metafield fetch error
/// yields "Unknown Supplier".
async fn resolve_supplier(
    state: &AppState,
    product_id: Option<i64>,
    vendor: Option<&str>,
) -> String {
    if let Some(product_id) = product_id {
        match state.shopify().get_product_metafields(product_id).await {
            Ok(metafields) => {
                if let Some(field) = metafields
                    .iter()
                    .find(|m| m.key == "supplier" || m.namespace == "custom")
                {
                    return field.value_string();
                }
            }
            Err(e) => {
                warn!(error = %e, product_id = %product_id, "Metafield fetch failed");
                return "Unknown Supplier".to_string();
            }
        }
    }

    vendor.map_or_else(|| "No Supplier Found".to_string(), String::from)
}

/// Fetch the order's maximum risk score, degrading to zero on failure.
async fn fetch_risk_score(state: &AppState, order_id: i64) -> Decimal {
    match state.shopify().get_max_risk_score(order_id).await {
        Ok(score) => score,
        Err(e) => {
            warn!(error = %e, "Risk lookup failed, treating as zero risk");
            Decimal::ZERO
        }
    }
}

/// Fetch the address verdict, degrading to no issue on failure or when the
/// service is not configured.
async fn fetch_address_issue(state: &AppState, order_id: i64) -> AddressIssue {
    let Some(client) = state.address_check() else {
        return AddressIssue::None;
    };

    match client.check_order(order_id).await {
        Ok(issue) => issue,
        Err(e) => {
            warn!(error = %e, "Address check failed, treating as no issue");
            AddressIssue::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    #[test]
    fn test_risk_threshold_constant_is_half() {
        assert_eq!(RISK_THRESHOLD, dec("0.5"));
    }

    #[test]
    fn test_high_risk_routes_to_review() {
        assert_eq!(decide_route(dec("0.73"), AddressIssue::None), Route::Risk);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly 0.5 is not "high risk".
        assert_eq!(decide_route(dec("0.5"), AddressIssue::None), Route::Standard);
        assert_eq!(decide_route(dec("0.51"), AddressIssue::None), Route::Risk);
    }

    #[test]
    fn test_address_warning_routes_to_review() {
        assert_eq!(
            decide_route(dec("0.1"), AddressIssue::Warning),
            Route::Warning
        );
    }

    #[test]
    fn test_risk_outranks_address_warning() {
        assert_eq!(
            decide_route(dec("0.9"), AddressIssue::Warning),
            Route::Risk
        );
    }

    #[test]
    fn test_clean_order_routes_standard() {
        assert_eq!(
            decide_route(Decimal::ZERO, AddressIssue::None),
            Route::Standard
        );
    }
}
