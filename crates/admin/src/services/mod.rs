//! Business logic behind the admin pages.
//!
//! Controllers here are generic over [`crate::store::StoreApi`] so they can
//! be driven by the real client or an in-memory fake.

pub mod administrator_form;
pub mod auth;
pub mod listing;
pub mod product_form;

pub use administrator_form::{AdministratorForm, CreateOutcome};
pub use listing::{
    AdministratorsPage, Confirmation, DeleteOutcome, DeleteState, OrdersPage, ProductsPage,
    degrade,
};
pub use product_form::{
    CategoryOption, Navigation, ProductForm, ProductInput, SaveOutcome, UploadOutcome,
    load_categories,
};
