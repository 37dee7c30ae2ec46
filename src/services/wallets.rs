use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::{transactions, wallets};
use crate::repositories::transactions::TransactionRepository;
use crate::repositories::wallets::WalletRepository;

pub enum WalletRequest {
    GetOrCreate {
        chat_id: String,
        response: oneshot::Sender<Result<wallets::Wallet, ServiceError>>,
    },
    ListTransactions {
        chat_id: String,
        limit: i64,
        offset: i64,
        response: oneshot::Sender<Result<(Vec<transactions::Transaction>, i64), ServiceError>>,
    },
    Record {
        chat_id: String,
        kind: String,
        amount_in_cents: i64,
        description: String,
        status: String,
        metadata: Option<serde_json::Value>,
        response: oneshot::Sender<Result<transactions::Transaction, ServiceError>>,
    },
    Debit {
        chat_id: String,
        amount_in_cents: i64,
        description: String,
        metadata: Option<serde_json::Value>,
        response: oneshot::Sender<Result<transactions::Transaction, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct WalletRequestHandler {
    wallets: WalletRepository,
    transactions: TransactionRepository,
}

impl WalletRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let wallets = WalletRepository::new(sql_conn.clone());
        let transactions = TransactionRepository::new(sql_conn);

        WalletRequestHandler {
            wallets,
            transactions,
        }
    }

    async fn get_or_create(&self, chat_id: &str) -> Result<wallets::Wallet, ServiceError> {
        self.wallets
            .get_or_create(chat_id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn list_transactions(
        &self,
        chat_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<transactions::Transaction>, i64), ServiceError> {
        self.transactions
            .list(chat_id, limit, offset)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn record(
        &self,
        chat_id: &str,
        kind: &str,
        amount_in_cents: i64,
        description: &str,
        status: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<transactions::Transaction, ServiceError> {
        self.transactions
            .record(chat_id, kind, amount_in_cents, description, status, metadata)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn debit(
        &self,
        chat_id: &str,
        amount_in_cents: i64,
        description: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<transactions::Transaction, ServiceError> {
        self.wallets
            .debit(chat_id, amount_in_cents, description, metadata)
            .await
            .map_err(|e| ServiceError::Repository("WalletService".to_string(), e.to_string()))
    }
}

#[async_trait]
impl RequestHandler<WalletRequest> for WalletRequestHandler {
    async fn handle_request(&self, request: WalletRequest) {
        match request {
            WalletRequest::GetOrCreate { chat_id, response } => {
                let wallet = self.get_or_create(&chat_id).await;
                let _ = response.send(wallet);
            }
            WalletRequest::ListTransactions {
                chat_id,
                limit,
                offset,
                response,
            } => {
                let transactions = self.list_transactions(&chat_id, limit, offset).await;
                let _ = response.send(transactions);
            }
            WalletRequest::Record {
                chat_id,
                kind,
                amount_in_cents,
                description,
                status,
                metadata,
                response,
            } => {
                let transaction = self
                    .record(&chat_id, &kind, amount_in_cents, &description, &status, metadata)
                    .await;
                let _ = response.send(transaction);
            }
            WalletRequest::Debit {
                chat_id,
                amount_in_cents,
                description,
                metadata,
                response,
            } => {
                let transaction = self
                    .debit(&chat_id, amount_in_cents, &description, metadata)
                    .await;
                let _ = response.send(transaction);
            }
        }
    }
}

pub struct WalletService;

impl WalletService {
    pub fn new() -> Self {
        WalletService {}
    }
}

#[async_trait]
impl Service<WalletRequest, WalletRequestHandler> for WalletService {}
