use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tokio::sync::oneshot;

use crate::services::referrals::ReferralRequest;
use crate::utils;

pub async fn summary(
    State(state): State<super::AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    let (summary_tx, summary_rx) = oneshot::channel();

    let sent = state
        .referral_channel
        .send(ReferralRequest::Summary {
            chat_id,
            response: summary_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match summary_rx.await {
        Ok(Ok(summary)) => (
            StatusCode::OK,
            Json(json!({
                "code": summary.referral_code,
                "link": summary.link,
                "total_referrals": summary.total_referrals,
                "successful_referrals": summary.successful_referrals,
                "total_earned": utils::format_cents(summary.total_earned_in_cents),
                "pending_earned": utils::format_cents(summary.pending_earned_in_cents),
                "commission_per_referral": utils::format_cents(summary.commission_in_cents),
            })),
        ),
        Ok(Err(e)) => super::service_error(e),
        Err(e) => super::channel_error(e.to_string()),
    }
}

pub async fn list_referred(
    State(state): State<super::AppState>,
    Path(chat_id): Path<String>,
    Query(page): Query<super::PageQuery>,
) -> impl IntoResponse {
    let (limit, offset) = utils::page_params(page.limit, page.offset);
    let (list_tx, list_rx) = oneshot::channel();

    let sent = state
        .referral_channel
        .send(ReferralRequest::ListReferred {
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
        Ok(Ok((referred, total))) => {
            let items: Vec<serde_json::Value> = referred
                .iter()
                .map(|r| {
                    json!({
                        "user_id": r.user_id,
                        "username": r.username,
                        "joined_at": r.joined_at,
                        "earned_amount": utils::format_cents(r.earned_in_cents),
                        "is_active": r.is_active,
                    })
                })
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "referred_users": items,
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
