use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::upi::LinkUpiRequest;
use crate::services::upi::UpiRequest;

pub async fn upsert_link(
    State(state): State<super::AppState>,
    Json(req): Json<LinkUpiRequest>,
) -> impl IntoResponse {
    let Some(chat_id) = req.chat_id.filter(|c| !c.is_empty()) else {
        return super::missing_parameter("chat_id");
    };

    let (link_tx, link_rx) = oneshot::channel();

    let sent = state
        .upi_channel
        .send(UpiRequest::Upsert {
            chat_id,
            vpa: req.vpa,
            bank_name: req.bank_name,
            response: link_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match link_rx.await {
        Ok(Ok(link)) => (
            StatusCode::OK,
            Json(json!({
                "chat_id": link.chat_id,
                "vpa": link.vpa,
                "bank_name": link.bank_name,
                "is_verified": link.is_verified,
                "linked_at": link.linked_at,
            })),
        ),
        Ok(Err(e)) => super::service_error(e),
        Err(e) => super::channel_error(e.to_string()),
    }
}
