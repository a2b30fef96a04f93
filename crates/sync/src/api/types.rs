//! Wire types for the Superball order API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The complete order-create request body.
///
/// Built fresh per send attempt, immutable once constructed. Every key the
/// supplier requires is present by construction; [`Self::missing_fields`]
/// guards against a defaulting regression before the payload leaves the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierOrderPayload {
    /// Deterministic external id (`FURNIZO-{order_id}`), the idempotency
    /// handle on the supplier side.
    pub id_customer_order_external: String,
    pub id_language: u32,
    pub domain: String,
    pub shipping_type: String,
    pub billing_type: String,
    pub payment_type: String,
    pub observations: String,
    /// `1` when the integration runs in testing mode.
    pub use_for_testing: u8,
    pub currency: String,
    pub products: Vec<PayloadProduct>,
    pub customer: PayloadCustomer,
    pub customer_address_shipping: PayloadShippingAddress,
    pub customer_address_billing_company: PayloadBillingCompany,
    pub customer_order_delivery: PayloadOrderDelivery,
}

/// One eligible product line in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadProduct {
    pub name: String,
    /// SKU, the supplier's product key.
    pub code: String,
    pub quantity: u32,
    pub date_delivery: String,
    pub date_delivery_from: String,
    pub date_delivery_to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadCustomer {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadShippingAddress {
    pub firstname: String,
    pub lastname: String,
    pub country: String,
    pub county: String,
    pub locality: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
}

/// Fixed billing identity of the ordering company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadBillingCompany {
    pub company: String,
    pub reg_no: String,
    pub vat_no: String,
    pub country: String,
    pub county: String,
    pub locality: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadOrderDelivery {
    pub id_customer_order_delivery: u32,
    pub dropshipping: u8,
}

impl SupplierOrderPayload {
    /// Check that every required key survived defaulting.
    ///
    /// Returns the names of empty required fields; an empty vec means the
    /// payload is complete. The transform defaults every field, so a
    /// non-empty result indicates a regression, not bad input.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let top: [(&'static str, &str); 7] = [
            ("id_customer_order_external", &self.id_customer_order_external),
            ("domain", &self.domain),
            ("shipping_type", &self.shipping_type),
            ("billing_type", &self.billing_type),
            ("payment_type", &self.payment_type),
            ("observations", &self.observations),
            ("currency", &self.currency),
        ];
        for (name, value) in top {
            if value.is_empty() {
                missing.push(name);
            }
        }
        if self.customer.email.is_empty() {
            missing.push("customer.email");
        }
        for product in &self.products {
            if product.name.is_empty() {
                missing.push("products.name");
            }
            if product.code.is_empty() {
                missing.push("products.code");
            }
            if product.quantity == 0 {
                missing.push("products.quantity");
            }
            if product.date_delivery.is_empty()
                || product.date_delivery_from.is_empty()
                || product.date_delivery_to.is_empty()
            {
                missing.push("products.date_delivery");
            }
        }
        missing
    }
}

/// Response envelope for every order API call.
///
/// The supplier is loose about `is_success`: observed values include `1`,
/// `true`, and `"1"`. The custom deserializer accepts all truthy spellings.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default, deserialize_with = "truthy")]
    pub is_success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// `data.id_customer_order`, as assigned by the supplier.
    ///
    /// The supplier returns it as a number or a string depending on the
    /// endpoint version; both are accepted.
    #[must_use]
    pub fn supplier_order_id(&self) -> Option<String> {
        match self.data.as_ref()?.get("id_customer_order")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> ApiEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn is_success_accepts_truthy_spellings() {
        assert!(envelope(r#"{"is_success": 1}"#).is_success);
        assert!(envelope(r#"{"is_success": true}"#).is_success);
        assert!(envelope(r#"{"is_success": "1"}"#).is_success);
    }

    #[test]
    fn is_success_rejects_falsy_spellings() {
        assert!(!envelope(r#"{"is_success": 0}"#).is_success);
        assert!(!envelope(r#"{"is_success": false}"#).is_success);
        assert!(!envelope(r#"{"is_success": "0"}"#).is_success);
        assert!(!envelope(r#"{"message": "no flag at all"}"#).is_success);
    }

    #[test]
    fn supplier_order_id_accepts_string_and_number() {
        let text = envelope(r#"{"is_success": 1, "data": {"id_customer_order": "SB-9"}}"#);
        assert_eq!(text.supplier_order_id().as_deref(), Some("SB-9"));

        let number = envelope(r#"{"is_success": 1, "data": {"id_customer_order": 1042}}"#);
        assert_eq!(number.supplier_order_id().as_deref(), Some("1042"));

        let absent = envelope(r#"{"is_success": 1, "data": {}}"#);
        assert_eq!(absent.supplier_order_id(), None);
    }
}
