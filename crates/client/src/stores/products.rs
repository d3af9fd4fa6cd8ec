use gstbill_core::ProductId;
use gstbill_products::{Product, ProductPayload};

use super::{Status, replace_by_id};
use crate::api::{ListParams, Page, ProductsApi};
use crate::error::ClientResult;

#[derive(Debug)]
pub struct ProductsStore {
    api: ProductsApi,
    products: Vec<Product>,
    page: Option<Page<()>>,
    status: Status,
}

impl ProductsStore {
    pub fn new(api: ProductsApi) -> Self {
        Self {
            api,
            products: Vec::new(),
            page: None,
            status: Status::default(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn active(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_active)
    }

    /// Pagination of the last successful fetch (items stripped).
    pub fn page(&self) -> Option<&Page<()>> {
        self.page.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn get_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Load one page. On failure the list is emptied.
    pub async fn fetch(&mut self, params: &ListParams) -> ClientResult<()> {
        self.status.begin();
        let result = self.api.list(params).await;
        let result = match result {
            Ok(page) => {
                self.page = Some(Page {
                    items: Vec::new(),
                    total: page.total,
                    page: page.page,
                    page_size: page.page_size,
                    total_pages: page.total_pages,
                });
                self.products = page.items;
                Ok(())
            }
            Err(err) => {
                self.products.clear();
                self.page = None;
                Err(err)
            }
        };
        self.status.finish(result)
    }

    pub async fn create(&mut self, payload: &ProductPayload) -> ClientResult<Product> {
        self.status.begin();
        let result = match payload.validate() {
            Ok(()) => self.api.create(payload).await,
            Err(err) => Err(err.into()),
        };
        if let Ok(product) = &result {
            self.products.push(product.clone());
        }
        self.status.finish(result)
    }

    pub async fn update(&mut self, id: ProductId, payload: &ProductPayload) -> ClientResult<Product> {
        self.status.begin();
        let result = match payload.validate() {
            Ok(()) => self.api.update(id, payload).await,
            Err(err) => Err(err.into()),
        };
        if let Ok(product) = &result {
            replace_by_id(&mut self.products, product);
        }
        self.status.finish(result)
    }

    /// Soft delete (`false`) or restore (`true`).
    pub async fn set_status(&mut self, id: ProductId, is_active: bool) -> ClientResult<Product> {
        self.status.begin();
        let result = self.api.set_status(id, is_active).await;
        if let Ok(product) = &result {
            replace_by_id(&mut self.products, product);
        }
        self.status.finish(result)
    }
}
