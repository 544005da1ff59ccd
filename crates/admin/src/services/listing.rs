//! Table page controllers for orders and administrators.
//!
//! Each page fetches its collection once per visit. A failed fetch is logged
//! and the page renders an empty table. Deleting an administrator goes
//! through an explicit confirmation step modelled by [`DeleteState`].

use backoffice_core::AdminId;
use tracing::{error, info, instrument};

use crate::models::{ConfirmDialog, Notice};
use crate::store::{Administrator, ApiError, Order, Product, StoreApi};

/// Collapse a failed background fetch into an empty collection.
///
/// The failure is logged at `error` with the collection name; the caller
/// renders whatever it gets back.
pub fn degrade<T>(result: Result<Vec<T>, ApiError>, collection: &'static str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        error!(collection, error = %e, "Failed to load collection");
        Vec::new()
    })
}

/// Orders table.
#[derive(Debug, Clone, Default)]
pub struct OrdersPage {
    orders: Vec<Order>,
}

impl OrdersPage {
    /// Fetch the order collection (one request).
    #[instrument(skip(api))]
    pub async fn load<A: StoreApi>(api: &A) -> Self {
        Self {
            orders: degrade(api.list_orders().await, "orders"),
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Whether to show the "No hay pedidos" row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Products table.
#[derive(Debug, Clone, Default)]
pub struct ProductsPage {
    products: Vec<Product>,
}

impl ProductsPage {
    /// Fetch the product collection (one request).
    #[instrument(skip(api))]
    pub async fn load<A: StoreApi>(api: &A) -> Self {
        Self {
            products: degrade(api.list_products().await, "products"),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Progress of an administrator deletion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    /// Waiting for the admin to answer the confirmation dialog.
    Confirming(AdminId),
    /// Delete request sent.
    InFlight(AdminId),
    /// The entry was removed.
    Succeeded(AdminId),
    /// The request failed; the entry is still listed.
    Failed(AdminId),
}

/// Answer to the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl Confirmation {
    /// Parse the dialog's `confirm` form value; anything but `yes` cancels.
    #[must_use]
    pub fn from_form_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("yes") {
            Self::Confirmed
        } else {
            Self::Cancelled
        }
    }
}

/// Result of [`AdministratorsPage::resolve_delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No confirmation was pending; nothing happened.
    NotRequested,
    Cancelled,
    Deleted,
    Failed,
}

/// Administrators table.
#[derive(Debug, Clone, Default)]
pub struct AdministratorsPage {
    administrators: Vec<Administrator>,
    delete: DeleteState,
    notice: Option<Notice>,
}

impl AdministratorsPage {
    /// Fetch the administrator collection (one request).
    #[instrument(skip(api))]
    pub async fn load<A: StoreApi>(api: &A) -> Self {
        Self::from_administrators(degrade(
            api.list_administrators().await,
            "administrators",
        ))
    }

    #[must_use]
    pub fn from_administrators(administrators: Vec<Administrator>) -> Self {
        Self {
            administrators,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn administrators(&self) -> &[Administrator] {
        &self.administrators
    }

    #[must_use]
    pub const fn delete_state(&self) -> &DeleteState {
        &self.delete
    }

    /// Notice produced by the last delete, if any.
    #[must_use]
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Ask for confirmation before deleting `id`. No request is made.
    pub fn request_delete(&mut self, id: AdminId) -> ConfirmDialog {
        self.delete = DeleteState::Confirming(id);
        ConfirmDialog::DELETE_ADMINISTRATOR
    }

    /// Resolve a pending confirmation.
    ///
    /// Cancelling returns to idle without a request. Confirming sends the
    /// delete; on success exactly that entry is removed, on failure the list
    /// is kept. Either way a notice is left for [`Self::take_notice`].
    #[instrument(skip(self, api))]
    pub async fn resolve_delete<A: StoreApi>(
        &mut self,
        api: &A,
        answer: Confirmation,
    ) -> DeleteOutcome {
        let DeleteState::Confirming(id) = std::mem::take(&mut self.delete) else {
            return DeleteOutcome::NotRequested;
        };

        if answer == Confirmation::Cancelled {
            return DeleteOutcome::Cancelled;
        }

        self.delete = DeleteState::InFlight(id.clone());
        match api.delete_administrator(&id).await {
            Ok(()) => {
                info!(admin_id = %id, "Administrator deleted");
                self.administrators.retain(|a| a.id != id);
                self.notice = Some(Notice::administrator_deleted());
                self.delete = DeleteState::Succeeded(id);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(admin_id = %id, error = %e, "Failed to delete administrator");
                self.notice = Some(Notice::administrator_delete_failed());
                self.delete = DeleteState::Failed(id);
                DeleteOutcome::Failed
            }
        }
    }
}
