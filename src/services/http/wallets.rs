use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tokio::sync::oneshot;

use crate::services::wallets::WalletRequest;
use crate::utils;

pub async fn get_balance(
    State(state): State<super::AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    let (wallet_tx, wallet_rx) = oneshot::channel();

    let sent = state
        .wallet_channel
        .send(WalletRequest::GetOrCreate {
            chat_id,
            response: wallet_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match wallet_rx.await {
        Ok(Ok(wallet)) => (
            StatusCode::OK,
            Json(json!({
                "chat_id": wallet.chat_id,
                "balance": utils::format_cents(wallet.balance_in_cents),
                "pending_balance": utils::format_cents(wallet.pending_in_cents),
                "currency": wallet.currency,
            })),
        ),
        Ok(Err(e)) => super::service_error(e),
        Err(e) => super::channel_error(e.to_string()),
    }
}

pub async fn list_transactions(
    State(state): State<super::AppState>,
    Path(chat_id): Path<String>,
    Query(page): Query<super::PageQuery>,
) -> impl IntoResponse {
    let (limit, offset) = utils::page_params(page.limit, page.offset);
    let (list_tx, list_rx) = oneshot::channel();

    let sent = state
        .wallet_channel
        .send(WalletRequest::ListTransactions {
            chat_id,
            limit,
            offset,
            response: list_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match list_rx.await {
        Ok(Ok((transactions, total))) => {
            let items: Vec<serde_json::Value> = transactions
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "type": t.kind,
                        "amount": utils::format_cents(t.amount_in_cents),
                        "description": t.description,
                        "status": t.status,
                        "timestamp": t.created_at,
                        "metadata": t.metadata,
                    })
                })
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "transactions": items,
                    "total": total,
                    "limit": limit,
                    "offset": offset,
                })),
            )
        }
        Ok(Err(e)) => super::service_error(e),
        Err(e) => super::channel_error(e.to_string()),
    }
}
