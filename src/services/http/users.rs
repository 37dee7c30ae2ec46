use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::users::{BotIdentifyRequest, IdentifyRequest, User};
use crate::services::users::UserRequest;

fn user_view(user: &User) -> serde_json::Value {
    json!({
        "chat_id": user.chat_id,
        "username": user.username,
        "avatar": user.avatar,
        "status": user.status,
        "referral_code": user.referral_code,
        "referred_by": user.referred_by,
        "created_at": user.created_at,
    })
}

pub async fn identify(
    State(state): State<super::AppState>,
    Json(req): Json<IdentifyRequest>,
) -> impl IntoResponse {
    let Some(chat_id) = req.chat_id.filter(|c| !c.is_empty()) else {
        return super::missing_parameter("chat_id");
    };

    let (user_tx, user_rx) = oneshot::channel();

    let sent = state
        .user_channel
        .send(UserRequest::Identify {
            chat_id,
            username: req.username.unwrap_or_default(),
            avatar: req.avatar.unwrap_or_default(),
            response: user_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match user_rx.await {
        Ok(Ok(user)) => (StatusCode::OK, Json(user_view(&user))),
        Ok(Err(e)) => super::service_error(e),
        Err(e) => super::channel_error(e.to_string()),
    }
}

pub async fn identify_from_referral(
    State(state): State<super::AppState>,
    Json(req): Json<BotIdentifyRequest>,
) -> impl IntoResponse {
    let Some(chat_id) = req.chat_id.filter(|c| !c.is_empty()) else {
        return super::missing_parameter("chat_id");
    };

    let (user_tx, user_rx) = oneshot::channel();

    let sent = state
        .user_channel
        .send(UserRequest::IdentifyFromReferral {
            chat_id,
            username: req.username.unwrap_or_default(),
            avatar: req.avatar.unwrap_or_default(),
            invite_code: req.invite_code,
            response: user_tx,
        })
        .await;

    if let Err(e) = sent {
        return super::channel_error(e.to_string());
    }

    match user_rx.await {
        Ok(Ok(user)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "referral_code": user.referral_code,
                "referred_by": user.referred_by,
            })),
        ),
        Ok(Err(e)) => {
            log::error!("Bot identity request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "error": "Internal server error"})),
            )
        }
        Err(e) => super::channel_error(e.to_string()),
    }
}
