use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::withdrawals::{NewWithdrawal, SettleWithdrawal, Withdrawal};
use crate::services::withdrawals::WithdrawalRequest;
use crate::utils;

fn withdrawal_view(withdrawal: &Withdrawal) -> serde_json::Value {
    json!({
        "id": withdrawal.id,
        "amount": utils::format_cents(withdrawal.amount_in_cents),
        "fee": utils::format_cents(withdrawal.fee_in_cents),
        "net_amount": utils::format_cents(withdrawal.net_in_cents),
        "vpa": withdrawal.vpa,
        "status": withdrawal.status,
        "initiated_at": withdrawal.initiated_at,
        "completed_at": withdrawal.completed_at,
        "transaction_id": withdrawal.transaction_id,
        "failure_reason": withdrawal.failure_reason,
    })
}

pub async fn initiate(
    State(state): State<super::AppState>,
    Json(req): Json<NewWithdrawal>,
) -> impl IntoResponse {
    let Some(chat_id) = req.chat_id.filter(|c| !c.is_empty()) else {
        return super::missing_parameter("chat_id");
    };
    let amount = match req.amount {
        Some(amount) if amount > 0.0 => amount,
        _ => return super::missing_parameter("amount"),
    };
    let Some(vpa) = req.vpa.filter(|v| !v.is_empty()) else {
        return super::missing_parameter("vpa");
    };

    let (withdrawal_tx, withdrawal_rx) = oneshot::channel();

    let sent = state
        .withdrawal_channel
        .send(WithdrawalRequest::Initiate {
            chat_id,
            amount_in_cents: utils::to_cents(amount),
            vpa,
            response: withdrawal_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match withdrawal_rx.await {
        Ok(Ok(withdrawal)) => (StatusCode::CREATED, Json(withdrawal_view(&withdrawal))),
        Ok(Err(e)) => super::service_error(e),
        Err(e) => super::channel_error(e.to_string()),
    }
}

pub async fn list(
    State(state): State<super::AppState>,
    Path(chat_id): Path<String>,
    Query(page): Query<super::PageQuery>,
) -> impl IntoResponse {
    let (limit, offset) = utils::page_params(page.limit, page.offset);
    let (list_tx, list_rx) = oneshot::channel();

    let sent = state
        .withdrawal_channel
        .send(WithdrawalRequest::List {
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
        Ok(Ok((withdrawals, total))) => {
            let items: Vec<serde_json::Value> =
                withdrawals.iter().map(withdrawal_view).collect();

            (
                StatusCode::OK,
                Json(json!({
                    "withdrawals": items,
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

pub async fn settle(
    State(state): State<super::AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettleWithdrawal>,
) -> impl IntoResponse {
    let status = match req.status.as_deref() {
        Some(status @ ("completed" | "failed")) => status.to_string(),
        _ => return super::missing_parameter("status"),
    };

    let (settle_tx, settle_rx) = oneshot::channel();

    let sent = state
        .withdrawal_channel
        .send(WithdrawalRequest::Settle {
            id,
            status,
            transaction_id: req.transaction_id,
            failure_reason: req.failure_reason,
            response: settle_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match settle_rx.await {
        Ok(Ok(withdrawal)) => (StatusCode::OK, Json(withdrawal_view(&withdrawal))),
        Ok(Err(e)) => super::service_error(e),
        Err(e) => super::channel_error(e.to_string()),
    }
}
