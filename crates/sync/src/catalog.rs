//! Product catalog collaborator trait.
//!
//! The host platform owns the catalog. The engine creates products during
//! import, sets stock quantities during reconciliation, and attaches remote
//! images; it never edits the name, price, or description of an existing
//! product. Image download and transcoding are the host's opaque
//! "attach remote file" capability.

use thiserror::Error;
use url::Url;

use superball_core::{AttachmentId, CatalogProduct, NewProduct, ProductId, Sku};

/// Errors surfaced by a catalog implementation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("a product with SKU '{0}' already exists")]
    DuplicateSku(Sku),

    #[error("image attach failed: {0}")]
    ImageAttach(String),

    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog error: {0}")]
    Backend(String),
}

/// Read/write access to the host product catalog.
pub trait ProductCatalog {
    /// Resolve a SKU to a product id. SKUs are unique in the catalog.
    fn product_id_by_sku(&self, sku: &Sku) -> Result<Option<ProductId>, CatalogError>;

    /// Load one product, if it exists.
    fn product(&self, id: ProductId) -> Result<Option<CatalogProduct>, CatalogError>;

    /// Create a draft, stock-managed product with zero initial quantity.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateSku`] if the SKU is already taken; callers
    /// check first, this is the backstop.
    fn create_product(&self, new: NewProduct) -> Result<ProductId, CatalogError>;

    /// Absolute stock set - last write wins, never a delta.
    fn set_stock_quantity(&self, id: ProductId, quantity: i64) -> Result<(), CatalogError>;

    /// Download a remote file and attach it to the product, returning the
    /// attachment id. Downloading the same URL twice for the same product
    /// yields the same id.
    fn attach_remote_image(&self, id: ProductId, url: &Url)
    -> Result<AttachmentId, CatalogError>;

    /// Mark an attachment as the product's primary image.
    fn set_featured_image(
        &self,
        id: ProductId,
        attachment: AttachmentId,
    ) -> Result<(), CatalogError>;

    /// The product's current gallery attachment ids.
    fn gallery(&self, id: ProductId) -> Result<Vec<AttachmentId>, CatalogError>;

    /// Append an attachment to the product gallery.
    fn append_gallery_image(
        &self,
        id: ProductId,
        attachment: AttachmentId,
    ) -> Result<(), CatalogError>;
}
