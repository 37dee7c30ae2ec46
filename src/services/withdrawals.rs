use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::{mpsc, oneshot};

use super::wallets::WalletRequest;
use super::{RequestHandler, Service, ServiceError};
use crate::models::withdrawals;
use crate::repositories::withdrawals::WithdrawalRepository;

const WITHDRAWAL_FEE_IN_CENTS: i64 = 300;

pub enum WithdrawalRequest {
    Initiate {
        chat_id: String,
        amount_in_cents: i64,
        vpa: String,
        response: oneshot::Sender<Result<withdrawals::Withdrawal, ServiceError>>,
    },
    List {
        chat_id: String,
        limit: i64,
        offset: i64,
        response: oneshot::Sender<Result<(Vec<withdrawals::Withdrawal>, i64), ServiceError>>,
    },
    Settle {
        id: String,
        status: String,
        transaction_id: Option<String>,
        failure_reason: Option<String>,
        response: oneshot::Sender<Result<withdrawals::Withdrawal, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct WithdrawalRequestHandler {
    repository: WithdrawalRepository,
    wallet_channel: mpsc::Sender<WalletRequest>,
}

impl WithdrawalRequestHandler {
    pub fn new(sql_conn: PgPool, wallet_channel: mpsc::Sender<WalletRequest>) -> Self {
        let repository = WithdrawalRepository::new(sql_conn);

        WithdrawalRequestHandler {
            repository,
            wallet_channel,
        }
    }

    async fn initiate(
        &self,
        chat_id: &str,
        amount_in_cents: i64,
        vpa: &str,
    ) -> Result<withdrawals::Withdrawal, ServiceError> {
        let (fee_in_cents, net_in_cents) = compute_net(amount_in_cents);

        // no wallet mutation here; settlement reconciles the ledger later
        self.repository
            .initiate(chat_id, amount_in_cents, fee_in_cents, net_in_cents, vpa)
            .await
            .map_err(|e| ServiceError::Repository("WithdrawalService".to_string(), e.to_string()))
    }

    async fn list(
        &self,
        chat_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<withdrawals::Withdrawal>, i64), ServiceError> {
        self.repository
            .list(chat_id, limit, offset)
            .await
            .map_err(|e| ServiceError::Repository("WithdrawalService".to_string(), e.to_string()))
    }

    async fn settle(
        &self,
        id: &str,
        status: &str,
        transaction_id: Option<String>,
        failure_reason: Option<String>,
    ) -> Result<withdrawals::Withdrawal, ServiceError> {
        let withdrawal = self
            .repository
            .settle(id, status, transaction_id.as_deref(), failure_reason.as_deref())
            .await
            .map_err(|e| ServiceError::Repository("WithdrawalService".to_string(), e.to_string()))?;

        let Some(withdrawal) = withdrawal else {
            return Err(ServiceError::NotFound(format!(
                "No pending withdrawal {}",
                id
            )));
        };

        self.reconcile(&withdrawal).await;

        Ok(withdrawal)
    }

    // Reconciliation failure leaves the withdrawal settled; there is no
    // compensation, only the error log.
    async fn reconcile(&self, withdrawal: &withdrawals::Withdrawal) {
        let metadata = serde_json::json!({
            "withdrawal_id": withdrawal.id,
            "vpa": withdrawal.vpa,
        });

        let (wallet_tx, wallet_rx) = oneshot::channel();
        let request = if withdrawal.status == "completed" {
            WalletRequest::Debit {
                chat_id: withdrawal.chat_id.clone(),
                amount_in_cents: withdrawal.amount_in_cents,
                description: "Withdrawal payout".to_string(),
                metadata: Some(metadata),
                response: wallet_tx,
            }
        } else {
            WalletRequest::Record {
                chat_id: withdrawal.chat_id.clone(),
                kind: "debit".to_string(),
                amount_in_cents: withdrawal.amount_in_cents,
                description: "Withdrawal failed".to_string(),
                status: "failed".to_string(),
                metadata: Some(metadata),
                response: wallet_tx,
            }
        };

        if self.wallet_channel.send(request).await.is_err() {
            log::error!("Could not reach wallet service for withdrawal {}.", withdrawal.id);
            return;
        }

        match wallet_rx.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => log::error!("Could not reconcile withdrawal {}: {}", withdrawal.id, e),
            Err(e) => log::error!(
                "Wallet service dropped withdrawal {}: {}",
                withdrawal.id,
                e
            ),
        }
    }
}

// Fixed fee; net goes negative below the fee since no minimum amount is
// enforced.
fn compute_net(amount_in_cents: i64) -> (i64, i64) {
    (
        WITHDRAWAL_FEE_IN_CENTS,
        amount_in_cents - WITHDRAWAL_FEE_IN_CENTS,
    )
}

#[async_trait]
impl RequestHandler<WithdrawalRequest> for WithdrawalRequestHandler {
    async fn handle_request(&self, request: WithdrawalRequest) {
        match request {
            WithdrawalRequest::Initiate {
                chat_id,
                amount_in_cents,
                vpa,
                response,
            } => {
                let withdrawal = self.initiate(&chat_id, amount_in_cents, &vpa).await;
                let _ = response.send(withdrawal);
            }
            WithdrawalRequest::List {
                chat_id,
                limit,
                offset,
                response,
            } => {
                let withdrawals = self.list(&chat_id, limit, offset).await;
                let _ = response.send(withdrawals);
            }
            WithdrawalRequest::Settle {
                id,
                status,
                transaction_id,
                failure_reason,
                response,
            } => {
                let withdrawal = self
                    .settle(&id, &status, transaction_id, failure_reason)
                    .await;
                let _ = response.send(withdrawal);
            }
        }
    }
}

pub struct WithdrawalService;

impl WithdrawalService {
    pub fn new() -> Self {
        WithdrawalService {}
    }
}

#[async_trait]
impl Service<WithdrawalRequest, WithdrawalRequestHandler> for WithdrawalService {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_is_fixed() {
        let (fee, net) = compute_net(10000);
        assert_eq!(fee, 300);
        assert_eq!(net, 9700);
    }

    #[test]
    fn net_goes_negative_below_the_fee() {
        let (fee, net) = compute_net(200);
        assert_eq!(fee, 300);
        assert_eq!(net, -100);
    }

    #[test]
    fn zero_amount_nets_the_negated_fee() {
        assert_eq!(compute_net(0), (300, -300));
    }
}
