//! Order payload assembly.
//!
//! Pure transformation from a host order plus its eligible products into
//! the supplier's wire format. Every field the supplier requires is
//! defaulted deterministically - absent address fields become a literal
//! placeholder, never null or omitted - so the same sparse order always
//! produces the same complete payload.

use superball_core::Order;

use super::eligibility::{EligibleProduct, PLACEHOLDER};
use crate::api::{
    PayloadBillingCompany, PayloadCustomer, PayloadOrderDelivery, PayloadProduct,
    PayloadShippingAddress, SupplierOrderPayload,
};

/// Prefix for the deterministic external order id. Retrying a send reuses
/// the same id, which lets the supplier deduplicate.
pub const EXTERNAL_ID_PREFIX: &str = "FURNIZO-";

const LANGUAGE_ID: u32 = 1;
const STORE_DOMAIN: &str = "furnizo.ro";
const SHIPPING_TYPE: &str = "carrier";
const BILLING_TYPE: &str = "company";
const PAYMENT_TYPE: &str = "bank_transfer";
const CURRENCY: &str = "RON";

/// Used when an order carries no billing email; the supplier rejects an
/// empty customer block.
const FALLBACK_CUSTOMER_EMAIL: &str = "mindcanvas.srl@gmail.com";

/// Delivery-date placeholder until the supplier exposes real lead times.
const DELIVERY_DATE: &str = "2025-02-23";

/// Billing identity of the ordering company (Mind Canvas SRL).
const COMPANY_NAME: &str = "Mind Canvas SRL";
const COMPANY_REG_NO: &str = "J40/24810/2023";
const COMPANY_VAT_NO: &str = "49337905";
const COMPANY_COUNTRY: &str = "RO";
const COMPANY_COUNTY: &str = "București";
const COMPANY_LOCALITY: &str = "Sector 3";
const COMPANY_ADDRESS: &str = "Calea Calarasilor, Nr. 319A, Ap. 4";
const COMPANY_POSTAL_CODE: &str = "000000";
const COMPANY_PHONE: &str = "0722000000";

/// The deterministic external id for an order.
#[must_use]
pub fn external_order_id(order: &Order) -> String {
    format!("{EXTERNAL_ID_PREFIX}{}", order.id)
}

/// Assemble the complete order payload.
///
/// Pure: no network or store access. The caller records the assembled
/// payload in the diagnostic log before sending.
#[must_use]
pub fn build_payload(
    order: &Order,
    products: &[EligibleProduct],
    use_for_testing: bool,
) -> SupplierOrderPayload {
    let products = products
        .iter()
        .map(|p| PayloadProduct {
            name: or_placeholder(Some(&p.name)),
            code: or_placeholder(Some(&p.code)),
            quantity: if p.quantity == 0 { 1 } else { p.quantity },
            date_delivery: DELIVERY_DATE.to_string(),
            date_delivery_from: DELIVERY_DATE.to_string(),
            date_delivery_to: DELIVERY_DATE.to_string(),
        })
        .collect();

    let email = order
        .billing_email
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or(FALLBACK_CUSTOMER_EMAIL)
        .to_string();

    SupplierOrderPayload {
        id_customer_order_external: external_order_id(order),
        id_language: LANGUAGE_ID,
        domain: STORE_DOMAIN.to_string(),
        shipping_type: SHIPPING_TYPE.to_string(),
        billing_type: BILLING_TYPE.to_string(),
        payment_type: PAYMENT_TYPE.to_string(),
        observations: or_placeholder(order.customer_note.as_deref()),
        use_for_testing: u8::from(use_for_testing),
        currency: CURRENCY.to_string(),
        products,
        customer: PayloadCustomer { email },
        customer_address_shipping: PayloadShippingAddress {
            firstname: or_placeholder(order.shipping.first_name.as_deref()),
            lastname: or_placeholder(order.shipping.last_name.as_deref()),
            country: or_placeholder(order.shipping.country.as_deref()),
            county: or_placeholder(order.shipping.county.as_deref()),
            locality: or_placeholder(order.shipping.locality.as_deref()),
            address: or_placeholder(order.shipping.address.as_deref()),
            postal_code: or_placeholder(order.shipping.postal_code.as_deref()),
            phone: or_placeholder(order.billing_phone.as_deref()),
        },
        customer_address_billing_company: PayloadBillingCompany {
            company: COMPANY_NAME.to_string(),
            reg_no: COMPANY_REG_NO.to_string(),
            vat_no: COMPANY_VAT_NO.to_string(),
            country: COMPANY_COUNTRY.to_string(),
            county: COMPANY_COUNTY.to_string(),
            locality: COMPANY_LOCALITY.to_string(),
            address: COMPANY_ADDRESS.to_string(),
            postal_code: COMPANY_POSTAL_CODE.to_string(),
            phone: COMPANY_PHONE.to_string(),
        },
        customer_order_delivery: PayloadOrderDelivery {
            id_customer_order_delivery: 1,
            dropshipping: 1,
        },
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
