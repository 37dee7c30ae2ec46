use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::settings::Settings;

mod http;
mod referrals;
mod upi;
mod users;
mod wallets;
mod withdrawals;

#[derive(Debug, thiserror::Error)]
enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error("Not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(pool: PgPool, settings: Settings) -> Result<(), anyhow::Error> {
    let (user_tx, mut user_rx) = mpsc::channel(512);
    let (wallet_tx, mut wallet_rx) = mpsc::channel(512);
    let (upi_tx, mut upi_rx) = mpsc::channel(512);
    let (referral_tx, mut referral_rx) = mpsc::channel(512);
    let (withdrawal_tx, mut withdrawal_rx) = mpsc::channel(512);

    let mut user_service = users::UserService::new();
    let mut wallet_service = wallets::WalletService::new();
    let mut upi_service = upi::UpiService::new();
    let mut referral_service = referrals::ReferralService::new();
    let mut withdrawal_service = withdrawals::WithdrawalService::new();

    println!("[*] Starting user service.");
    let user_pool = pool.clone();
    let user_wallet_tx = wallet_tx.clone();
    let user_referral_tx = referral_tx.clone();
    tokio::spawn(async move {
        user_service
            .run(
                users::UserRequestHandler::new(user_pool, user_wallet_tx, user_referral_tx),
                &mut user_rx,
            )
            .await;
    });

    println!("[*] Starting wallet service.");
    let wallet_pool = pool.clone();
    tokio::spawn(async move {
        wallet_service
            .run(wallets::WalletRequestHandler::new(wallet_pool), &mut wallet_rx)
            .await;
    });

    println!("[*] Starting UPI service.");
    let upi_pool = pool.clone();
    tokio::spawn(async move {
        upi_service
            .run(upi::UpiRequestHandler::new(upi_pool), &mut upi_rx)
            .await;
    });

    log::info!("Starting referral service.");
    let referral_pool = pool.clone();
    let referral_user_tx = user_tx.clone();
    let referral_settings = settings.referral.clone();
    tokio::spawn(async move {
        referral_service
            .run(
                referrals::ReferralRequestHandler::new(
                    referral_pool,
                    referral_user_tx,
                    referral_settings,
                ),
                &mut referral_rx,
            )
            .await;
    });

    println!("[*] Starting withdrawal service.");
    let withdrawal_pool = pool.clone();
    let withdrawal_wallet_tx = wallet_tx.clone();
    tokio::spawn(async move {
        withdrawal_service
            .run(
                withdrawals::WithdrawalRequestHandler::new(withdrawal_pool, withdrawal_wallet_tx),
                &mut withdrawal_rx,
            )
            .await;
    });

    println!("[*] Starting HTTP server.");
    http::start_http_server(
        settings.server.listen,
        user_tx,
        wallet_tx,
        upi_tx,
        referral_tx,
        withdrawal_tx,
    )
    .await?;

    Ok(())
}
