//! In-memory [`StoreApi`] used by controller tests.

use std::sync::Mutex;

use backoffice_core::{AdminId, ProductId};

use super::{
    Administrator, ApiError, Category, NewAdministrator, Order, Product, ProductPayload, StoreApi,
    UploadFile,
};

/// A recorded store API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListCategories,
    ListProducts,
    GetProduct(String),
    CreateProduct(ProductPayload),
    UpdateProduct(ProductPayload),
    Upload(Vec<String>),
    ListOrders,
    ListAdministrators,
    CreateAdministrator(NewAdministrator),
    DeleteAdministrator(String),
}

/// Canned store that records every call.
///
/// Uploaded files are "hosted" at `https://cdn.test/{file_name}`. When
/// `fail` is set, every call answers `503`.
#[derive(Default)]
pub struct FakeStore {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub administrators: Vec<Administrator>,
    pub fail: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl FakeStore {
    /// A store whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn answer<T>(&self, value: T) -> Result<T, ApiError> {
        if self.fail {
            Err(ApiError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        } else {
            Ok(value)
        }
    }
}

impl StoreApi for FakeStore {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record(Call::ListCategories);
        self.answer(self.categories.clone())
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record(Call::ListProducts);
        self.answer(self.products.clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, ApiError> {
        self.record(Call::GetProduct(id.to_string()));
        self.answer(self.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        self.record(Call::CreateProduct(payload.clone()));
        self.answer(())
    }

    async fn update_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        self.record(Call::UpdateProduct(payload.clone()));
        self.answer(())
    }

    async fn upload_images(&self, files: Vec<UploadFile>) -> Result<Vec<String>, ApiError> {
        let names: Vec<String> = files.into_iter().map(|f| f.file_name).collect();
        self.record(Call::Upload(names.clone()));
        self.answer(
            names
                .iter()
                .map(|n| format!("https://cdn.test/{n}"))
                .collect(),
        )
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.record(Call::ListOrders);
        self.answer(self.orders.clone())
    }

    async fn list_administrators(&self) -> Result<Vec<Administrator>, ApiError> {
        self.record(Call::ListAdministrators);
        self.answer(self.administrators.clone())
    }

    async fn create_administrator(&self, admin: &NewAdministrator) -> Result<(), ApiError> {
        self.record(Call::CreateAdministrator(admin.clone()));
        self.answer(())
    }

    async fn delete_administrator(&self, id: &AdminId) -> Result<(), ApiError> {
        self.record(Call::DeleteAdministrator(id.to_string()));
        self.answer(())
    }
}
