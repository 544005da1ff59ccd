//! Orders route handler.

use askama::Template;
use axum::{Router, extract::State, response::Html, routing::get};
use tracing::instrument;

use super::{AdminUserView, render};
use crate::{
    filters,
    middleware::RequireAdminAuth,
    services::OrdersPage,
    state::AppState,
    store::Order,
};

/// Order row for the table.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub date: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub street_address: String,
    /// `"{name} X {quantity}"` per line item.
    pub products: Vec<String>,
    pub total: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            date: order
                .created_at
                .map(|at| at.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
            name: order.name.clone(),
            email: order.email.clone(),
            phone: order.phone.clone(),
            city: order.city.clone(),
            street_address: order.street_address.clone(),
            products: order
                .line_items
                .iter()
                .map(|item| format!("{} X {}", item.product_name, item.quantity))
                .collect(),
            total: order.total_amount.clone(),
        }
    }
}

/// Orders table template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub orders: Vec<OrderRowView>,
}

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/orders", get(index))
}

/// Order table; renders "No hay pedidos" when the list is empty or failed
/// to load.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Html<String> {
    let page = OrdersPage::load(state.store()).await;

    render(&OrdersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/orders".to_string(),
        orders: page.orders().iter().map(OrderRowView::from).collect(),
    })
}
