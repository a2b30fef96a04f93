//! In-memory collaborator fakes and fixture builders for unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use rust_decimal::Decimal;
use secrecy::SecretString;
use url::Url;

use superball_core::{
    AttachmentId, CatalogProduct, LineItem, NewProduct, Order, OrderId, OrderStatus, ProductId,
    ProductStatus, ShippingAddress, Sku, SyncState,
};

use crate::api::SupplierOrderPayload;
use crate::catalog::{CatalogError, ProductCatalog};
use crate::config::{StockUpdateFrequency, SupplierConfig};
use crate::orders::{EligibleProduct, build_payload};
use crate::store::{OrderStore, StoreError};

pub fn test_config() -> SupplierConfig {
    SupplierConfig {
        api_base_url: "http://supplier.invalid/api-v1".to_string(),
        feed_base_url: "http://supplier.invalid/api".to_string(),
        api_key: SecretString::from("test-key"),
        password: SecretString::from("hunter2"),
        is_testing: false,
        price_markup: Decimal::ZERO,
        stock_update_enabled: false,
        stock_update_frequency: StockUpdateFrequency::Daily,
        log_secrets: false,
    }
}

pub fn test_order(id: u64) -> Order {
    Order {
        id: OrderId::new(id),
        status: OrderStatus::Processing,
        items: Vec::new(),
        shipping: ShippingAddress::default(),
        billing_phone: Some("0711000111".to_string()),
        billing_email: Some("client@example.com".to_string()),
        customer_note: None,
    }
}

pub fn order_with_product(id: u64, product: ProductId) -> Order {
    let mut order = test_order(id);
    order.items = vec![LineItem {
        product: Some(product),
        quantity: 1,
    }];
    order
}

pub fn test_product(sku: &str, supplier_tag: Option<&str>) -> CatalogProduct {
    CatalogProduct {
        id: ProductId::new(0), // assigned by InMemoryCatalog::insert
        sku: Sku::new(sku),
        name: format!("Product {sku}"),
        price: Decimal::from(10),
        regular_price: Decimal::from(10),
        description: String::new(),
        status: ProductStatus::Published,
        manage_stock: true,
        stock_quantity: 0,
        supplier_tag: supplier_tag.map(str::to_string),
        purchase_cost: None,
        featured_image: None,
        gallery: Vec::new(),
    }
}

pub fn test_payload(order_id: u64) -> SupplierOrderPayload {
    let products = vec![EligibleProduct {
        name: "Lamp".to_string(),
        code: "SB-1".to_string(),
        quantity: 1,
    }];
    build_payload(&test_order(order_id), &products, false)
}

#[derive(Default)]
struct CatalogState {
    products: BTreeMap<ProductId, CatalogProduct>,
    next_product: u64,
    next_attachment: u64,
    attachments: HashMap<(ProductId, String), AttachmentId>,
}

/// Catalog fake: products in a map, attachments keyed by (product, URL) so
/// re-attaching the same URL yields the same id, as the host would.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    pub fn insert(&self, mut product: CatalogProduct) -> ProductId {
        let mut state = self.state.lock().unwrap();
        state.next_product += 1;
        let id = ProductId::new(state.next_product);
        product.id = id;
        state.products.insert(id, product);
        id
    }

    pub fn by_sku(&self, sku: &str) -> Option<CatalogProduct> {
        let wanted = Sku::new(sku);
        let state = self.state.lock().unwrap();
        state.products.values().find(|p| p.sku == wanted).cloned()
    }

    pub fn product_count(&self) -> usize {
        self.state.lock().unwrap().products.len()
    }

    pub fn set_quantity_raw(&self, id: ProductId, quantity: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.get_mut(&id) {
            product.stock_quantity = quantity;
        }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product_id_by_sku(&self, sku: &Sku) -> Result<Option<ProductId>, CatalogError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .values()
            .find(|p| &p.sku == sku)
            .map(|p| p.id))
    }

    fn product(&self, id: ProductId) -> Result<Option<CatalogProduct>, CatalogError> {
        Ok(self.state.lock().unwrap().products.get(&id).cloned())
    }

    fn create_product(&self, new: NewProduct) -> Result<ProductId, CatalogError> {
        let mut state = self.state.lock().unwrap();
        if state.products.values().any(|p| p.sku == new.sku) {
            return Err(CatalogError::DuplicateSku(new.sku));
        }
        state.next_product += 1;
        let id = ProductId::new(state.next_product);
        state.products.insert(
            id,
            CatalogProduct {
                id,
                sku: new.sku,
                name: new.name,
                price: new.price,
                regular_price: new.price,
                description: new.description,
                status: ProductStatus::Draft,
                manage_stock: true,
                stock_quantity: 0,
                supplier_tag: None,
                purchase_cost: Some(new.purchase_cost),
                featured_image: None,
                gallery: Vec::new(),
            },
        );
        Ok(id)
    }

    fn set_stock_quantity(&self, id: ProductId, quantity: i64) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.stock_quantity = quantity;
        Ok(())
    }

    fn attach_remote_image(
        &self,
        id: ProductId,
        url: &Url,
    ) -> Result<AttachmentId, CatalogError> {
        let mut state = self.state.lock().unwrap();
        if !state.products.contains_key(&id) {
            return Err(CatalogError::ProductNotFound(id));
        }
        let key = (id, url.to_string());
        if let Some(existing) = state.attachments.get(&key) {
            return Ok(*existing);
        }
        state.next_attachment += 1;
        let attachment = AttachmentId::new(state.next_attachment);
        state.attachments.insert(key, attachment);
        Ok(attachment)
    }

    fn set_featured_image(
        &self,
        id: ProductId,
        attachment: AttachmentId,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.featured_image = Some(attachment);
        Ok(())
    }

    fn gallery(&self, id: ProductId) -> Result<Vec<AttachmentId>, CatalogError> {
        let state = self.state.lock().unwrap();
        state
            .products
            .get(&id)
            .map(|p| p.gallery.clone())
            .ok_or(CatalogError::ProductNotFound(id))
    }

    fn append_gallery_image(
        &self,
        id: ProductId,
        attachment: AttachmentId,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.gallery.push(attachment);
        Ok(())
    }
}

#[derive(Default)]
struct OrderStoreState {
    orders: BTreeMap<OrderId, Order>,
    states: HashMap<OrderId, SyncState>,
    notes: HashMap<OrderId, Vec<String>>,
}

/// Order store fake backed by maps; candidate order is stable id order.
#[derive(Default)]
pub struct InMemoryOrderStore {
    state: Mutex<OrderStoreState>,
}

impl InMemoryOrderStore {
    pub fn insert(&self, order: Order) {
        let mut state = self.state.lock().unwrap();
        state.orders.insert(order.id, order);
    }

    pub fn set_state(&self, id: OrderId, sync_state: SyncState) {
        self.state.lock().unwrap().states.insert(id, sync_state);
    }

    pub fn state(&self, id: OrderId) -> SyncState {
        self.state
            .lock()
            .unwrap()
            .states
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn notes(&self, id: OrderId) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .notes
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.state.lock().unwrap().orders.get(&id).cloned())
    }

    fn sync_state(&self, id: OrderId) -> Result<SyncState, StoreError> {
        Ok(self.state(id))
    }

    fn set_sync_state(&self, id: OrderId, state: SyncState) -> Result<(), StoreError> {
        self.state.lock().unwrap().states.insert(id, state);
        Ok(())
    }

    fn unsent_candidates(&self, statuses: &[OrderStatus]) -> Result<Vec<OrderId>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .orders
            .values()
            .filter(|o| statuses.contains(&o.status))
            .filter(|o| !state.states.get(&o.id).is_some_and(SyncState::is_sent))
            .map(|o| o.id)
            .collect())
    }

    fn add_order_note(&self, id: OrderId, note: &str) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .notes
            .entry(id)
            .or_default()
            .push(note.to_string());
        Ok(())
    }
}
