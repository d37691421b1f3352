//! Payment history page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::Payment;
use crate::filters;
use crate::state::AppState;

pub const LOAD_FAILED_MESSAGE: &str = "Unable to load order history";

/// One row of the history table.
#[derive(Clone, Debug)]
pub struct PaymentRowView {
    /// Long date, e.g. "March 3, 2026".
    pub date: String,
    /// Short time, e.g. "02:15 PM".
    pub time: String,
    pub reference: String,
    pub status: String,
    pub badge_class: &'static str,
    pub amount: String,
}

impl From<&Payment> for PaymentRowView {
    fn from(payment: &Payment) -> Self {
        Self {
            date: payment.created_at.format("%B %-d, %Y").to_string(),
            time: payment.created_at.format("%I:%M %p").to_string(),
            reference: payment.stripe_payment_intent_id.clone(),
            status: payment.status.to_string(),
            badge_class: payment.status.badge_class(),
            amount: payment.amount().display(),
        }
    }
}

/// History page template.
#[derive(Template, WebTemplate)]
#[template(path = "history/index.html")]
pub struct HistoryTemplate {
    /// Rows in backend order (newest first).
    pub payments: Vec<PaymentRowView>,
    pub load_error: Option<String>,
}

/// Display the demo user's payments.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let user_id = state.config().demo_user_id;

    match state.api().payment_history(user_id).await {
        Ok(payments) => HistoryTemplate {
            payments: payments.iter().map(PaymentRowView::from).collect(),
            load_error: None,
        },
        Err(e) => {
            tracing::warn!(%user_id, "Failed to fetch payment history: {e}");
            HistoryTemplate {
                payments: Vec::new(),
                load_error: Some(LOAD_FAILED_MESSAGE.to_string()),
            }
        }
    }
}
