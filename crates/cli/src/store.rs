//! JSON-file-backed implementations of the engine's collaborator traits.
//!
//! In production the host platform provides orders and the catalog; the
//! CLI stands in with a single JSON file so the engine can run against
//! fixture data. Every mutation is written back immediately - an order or
//! row is only persisted once fully processed, matching the engine's
//! no-partial-state rule.
//!
//! `attach_remote_image` records the URL as an attachment without
//! downloading it; image transcoding is the host's opaque capability, not
//! this harness's.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use superball_core::{
    AttachmentId, CatalogProduct, NewProduct, Order, OrderId, OrderStatus, ProductId,
    ProductStatus, Sku, SyncState,
};
use superball_sync::store::{OrderStore, StoreError};
use superball_sync::{CatalogError, ProductCatalog};

/// Errors opening or persisting the store file.
#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("cannot read store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded attachment: which product it belongs to and the source URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttachmentRecord {
    product: ProductId,
    url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    orders: Vec<Order>,
    #[serde(default)]
    sync_states: BTreeMap<OrderId, SyncState>,
    #[serde(default)]
    order_notes: BTreeMap<OrderId, Vec<String>>,
    #[serde(default)]
    products: Vec<CatalogProduct>,
    #[serde(default)]
    attachments: BTreeMap<AttachmentId, AttachmentRecord>,
    #[serde(default)]
    next_product_id: u64,
    #[serde(default)]
    next_attachment_id: u64,
}

/// File-backed order store and product catalog.
pub struct JsonStore {
    path: PathBuf,
    data: Mutex<StoreFile>,
}

impl JsonStore {
    /// Open a store file, starting empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JsonStoreError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            StoreFile::default()
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    fn save(&self, data: &StoreFile) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        fs::write(&self.path, json).map_err(StoreError::Io)
    }

    fn save_catalog(&self, data: &StoreFile) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| CatalogError::Backend(e.to_string()))?;
        fs::write(&self.path, json).map_err(CatalogError::Io)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreFile> {
        // A poisoned lock means another panic is already unwinding; the
        // store data itself is never left half-written.
        self.data.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OrderStore for JsonStore {
    fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    fn sync_state(&self, id: OrderId) -> Result<SyncState, StoreError> {
        Ok(self.lock().sync_states.get(&id).cloned().unwrap_or_default())
    }

    fn set_sync_state(&self, id: OrderId, state: SyncState) -> Result<(), StoreError> {
        let mut data = self.lock();
        data.sync_states.insert(id, state);
        self.save(&data)
    }

    fn unsent_candidates(&self, statuses: &[OrderStatus]) -> Result<Vec<OrderId>, StoreError> {
        let data = self.lock();
        let mut candidates: Vec<OrderId> = data
            .orders
            .iter()
            .filter(|o| statuses.contains(&o.status))
            .filter(|o| !data.sync_states.get(&o.id).is_some_and(SyncState::is_sent))
            .map(|o| o.id)
            .collect();
        candidates.sort_unstable();
        Ok(candidates)
    }

    fn add_order_note(&self, id: OrderId, note: &str) -> Result<(), StoreError> {
        let mut data = self.lock();
        data.order_notes.entry(id).or_default().push(note.to_string());
        self.save(&data)
    }
}

impl ProductCatalog for JsonStore {
    fn product_id_by_sku(&self, sku: &Sku) -> Result<Option<ProductId>, CatalogError> {
        Ok(self
            .lock()
            .products
            .iter()
            .find(|p| &p.sku == sku)
            .map(|p| p.id))
    }

    fn product(&self, id: ProductId) -> Result<Option<CatalogProduct>, CatalogError> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    fn create_product(&self, new: NewProduct) -> Result<ProductId, CatalogError> {
        let mut data = self.lock();
        if data.products.iter().any(|p| p.sku == new.sku) {
            return Err(CatalogError::DuplicateSku(new.sku));
        }
        data.next_product_id += 1;
        let id = ProductId::new(data.next_product_id);
        data.products.push(CatalogProduct {
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
        });
        self.save_catalog(&data)?;
        Ok(id)
    }

    fn set_stock_quantity(&self, id: ProductId, quantity: i64) -> Result<(), CatalogError> {
        let mut data = self.lock();
        let product = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.stock_quantity = quantity;
        self.save_catalog(&data)
    }

    fn attach_remote_image(
        &self,
        id: ProductId,
        url: &Url,
    ) -> Result<AttachmentId, CatalogError> {
        let mut data = self.lock();
        if !data.products.iter().any(|p| p.id == id) {
            return Err(CatalogError::ProductNotFound(id));
        }
        let existing = data
            .attachments
            .iter()
            .find(|(_, r)| r.product == id && r.url == url.as_str())
            .map(|(a, _)| *a);
        if let Some(attachment) = existing {
            return Ok(attachment);
        }
        data.next_attachment_id += 1;
        let attachment = AttachmentId::new(data.next_attachment_id);
        data.attachments.insert(
            attachment,
            AttachmentRecord {
                product: id,
                url: url.to_string(),
            },
        );
        self.save_catalog(&data)?;
        Ok(attachment)
    }

    fn set_featured_image(
        &self,
        id: ProductId,
        attachment: AttachmentId,
    ) -> Result<(), CatalogError> {
        let mut data = self.lock();
        let product = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.featured_image = Some(attachment);
        self.save_catalog(&data)
    }

    fn gallery(&self, id: ProductId) -> Result<Vec<AttachmentId>, CatalogError> {
        self.lock()
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.gallery.clone())
            .ok_or(CatalogError::ProductNotFound(id))
    }

    fn append_gallery_image(
        &self,
        id: ProductId,
        attachment: AttachmentId,
    ) -> Result<(), CatalogError> {
        let mut data = self.lock();
        let product = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.gallery.push(attachment);
        self.save_catalog(&data)
    }
}
