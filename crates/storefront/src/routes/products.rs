//! Product listing and add-to-cart handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use luxe_pay_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{AddToCartRequest, Product};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::Flash;
use crate::state::AppState;

/// Flash text after a successful add.
pub const ADDED_MESSAGE: &str = "Added to cart!";

/// Flash text when the backend gives no reason.
pub const ADD_FAILED_MESSAGE: &str = "Failed to add";

/// Shown when the catalogue cannot be fetched.
pub const LOAD_FAILED_MESSAGE: &str = "Unable to load products";

/// Product card display data for templates.
#[derive(Clone, Debug)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
    /// No stock left: the card shows a disabled "Sold out" control.
    pub sold_out: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price().display(),
            stock: product.stock,
            sold_out: !product.in_stock(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub load_error: Option<String>,
    pub flash: Option<Flash>,
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let flash = Flash::take(&session).await;

    let (products, load_error) = match state.api().list_products().await {
        Ok(products) => (products.iter().map(ProductCardView::from).collect(), None),
        Err(e) => {
            tracing::warn!("Failed to fetch products: {e}");
            (Vec::new(), Some(LOAD_FAILED_MESSAGE.to_string()))
        }
    };

    ProductsIndexTemplate {
        products,
        load_error,
        flash,
    }
}

/// Add a product to the demo user's cart.
///
/// Always redirects back to the product grid; the outcome travels as a flash
/// message. Backend rejection text is shown as-is.
#[instrument(skip(state, session))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let request = AddToCartRequest {
        user_id: state.config().demo_user_id,
        product_id: form.product_id,
        quantity: i64::from(form.quantity.unwrap_or(1).max(1)),
    };

    let flash = match state.api().add_to_cart(&request).await {
        Ok(()) => {
            add_breadcrumb(
                "cart",
                "Added product",
                Some(&[("product_id", &request.product_id.to_string())]),
            );
            Flash::success(ADDED_MESSAGE)
        }
        Err(e) => {
            tracing::warn!(product_id = %request.product_id, "Failed to add to cart: {e}");
            Flash::error(e.user_message().unwrap_or(ADD_FAILED_MESSAGE))
        }
    };

    flash.store(&session).await?;

    Ok(Redirect::to("/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        Product {
            id: ProductId::new(3),
            name: "Chronograph".to_string(),
            description: "Steel case".to_string(),
            price: 129_900,
            stock,
        }
    }

    #[test]
    fn test_card_formats_price() {
        let card = ProductCardView::from(&product(4));
        assert_eq!(card.id, "3");
        assert_eq!(card.price, "$1299.00");
        assert!(!card.sold_out);
    }

    #[test]
    fn test_zero_stock_is_sold_out() {
        assert!(ProductCardView::from(&product(0)).sold_out);
        assert!(ProductCardView::from(&product(-1)).sold_out);
    }

    #[test]
    fn test_sold_out_card_renders_disabled_control() {
        let html = ProductsIndexTemplate {
            products: vec![ProductCardView::from(&product(0))],
            load_error: None,
            flash: None,
        }
        .render()
        .unwrap();

        assert!(html.contains("Sold out"));
        assert!(html.contains("disabled"));
        assert!(!html.contains("Add to Cart"));
    }

    #[test]
    fn test_in_stock_card_renders_enabled_control() {
        let html = ProductsIndexTemplate {
            products: vec![ProductCardView::from(&product(2))],
            load_error: None,
            flash: None,
        }
        .render()
        .unwrap();

        assert!(html.contains("Add to Cart"));
        assert!(!html.contains("Sold out"));
    }

    #[test]
    fn test_flash_is_rendered() {
        let html = ProductsIndexTemplate {
            products: Vec::new(),
            load_error: None,
            flash: Some(Flash::error("Insufficient stock")),
        }
        .render()
        .unwrap();

        assert!(html.contains("Insufficient stock"));
        assert!(html.contains("toast-error"));
    }
}
