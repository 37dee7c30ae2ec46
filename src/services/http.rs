use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use super::referrals::ReferralRequest;
use super::upi::UpiRequest;
use super::users::UserRequest;
use super::wallets::WalletRequest;
use super::withdrawals::WithdrawalRequest;
use super::ServiceError;

mod referrals;
mod upi;
mod users;
mod wallets;
mod withdrawals;

#[derive(Clone)]
struct AppState {
    user_channel: mpsc::Sender<UserRequest>,
    wallet_channel: mpsc::Sender<WalletRequest>,
    upi_channel: mpsc::Sender<UpiRequest>,
    referral_channel: mpsc::Sender<ReferralRequest>,
    withdrawal_channel: mpsc::Sender<WithdrawalRequest>,
}

#[derive(Deserialize)]
struct PageQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

fn missing_parameter(field: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "Missing or invalid parameter", "field": field})),
    )
}

fn channel_error(details: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal server error", "details": details})),
    )
}

fn service_error(error: ServiceError) -> (StatusCode, Json<serde_json::Value>) {
    match &error {
        ServiceError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Not found", "details": error.to_string()})),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Internal server error"})),
        ),
    }
}

pub async fn start_http_server(
    listen: String,
    user_channel: mpsc::Sender<UserRequest>,
    wallet_channel: mpsc::Sender<WalletRequest>,
    upi_channel: mpsc::Sender<UpiRequest>,
    referral_channel: mpsc::Sender<ReferralRequest>,
    withdrawal_channel: mpsc::Sender<WithdrawalRequest>,
) -> Result<(), anyhow::Error> {
    let app_state = AppState {
        user_channel,
        wallet_channel,
        upi_channel,
        referral_channel,
        withdrawal_channel,
    };

    let app = Router::new()
        .route("/api/user", post(users::identify))
        .route("/api/wallet/{chat_id}", get(wallets::get_balance))
        .route("/api/transactions/{chat_id}", get(wallets::list_transactions))
        .route("/api/upi", post(upi::upsert_link))
        .route("/api/withdraw", post(withdrawals::initiate))
        .route("/api/withdrawals/{chat_id}", get(withdrawals::list))
        .route("/api/referral/{chat_id}", get(referrals::summary))
        .route("/api/referral/{chat_id}/users", get(referrals::list_referred))
        .route("/bot/user", post(users::identify_from_referral))
        .route("/bot/withdrawals/{id}/settle", post(withdrawals::settle))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    println!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
