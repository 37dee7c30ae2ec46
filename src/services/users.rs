use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::{mpsc, oneshot};

use super::referrals::ReferralRequest;
use super::wallets::WalletRequest;
use super::{RequestHandler, Service, ServiceError};
use crate::{models::users, repositories::users::UserRepository};

pub enum UserRequest {
    Identify {
        chat_id: String,
        username: String,
        avatar: String,
        response: oneshot::Sender<Result<users::User, ServiceError>>,
    },
    IdentifyFromReferral {
        chat_id: String,
        username: String,
        avatar: String,
        invite_code: Option<String>,
        response: oneshot::Sender<Result<users::User, ServiceError>>,
    },
    GetUser {
        chat_id: String,
        response: oneshot::Sender<Result<Option<users::User>, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct UserRequestHandler {
    repository: UserRepository,
    wallet_channel: mpsc::Sender<WalletRequest>,
    referral_channel: mpsc::Sender<ReferralRequest>,
}

impl UserRequestHandler {
    pub fn new(
        sql_conn: PgPool,
        wallet_channel: mpsc::Sender<WalletRequest>,
        referral_channel: mpsc::Sender<ReferralRequest>,
    ) -> Self {
        let repository = UserRepository::new(sql_conn);

        UserRequestHandler {
            repository,
            wallet_channel,
            referral_channel,
        }
    }

    async fn identify(
        &self,
        chat_id: &str,
        username: &str,
        avatar: &str,
    ) -> Result<users::User, ServiceError> {
        let (user, _created) = self
            .repository
            .resolve_or_create(chat_id, username, avatar, None)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        self.provision_wallet(chat_id).await;

        Ok(user)
    }

    // Bot path: the only caller allowed to set referred_by. The raw invite
    // code is stored even when it matches no inviter; linkage happens only on
    // first creation.
    async fn identify_from_referral(
        &self,
        chat_id: &str,
        username: &str,
        avatar: &str,
        invite_code: Option<String>,
    ) -> Result<users::User, ServiceError> {
        let (user, created) = self
            .repository
            .resolve_or_create(chat_id, username, avatar, invite_code.as_deref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        self.provision_wallet(chat_id).await;

        if created {
            if let Some(code) = invite_code {
                self.link_invitee(&code, &user).await;
            }
        }

        Ok(user)
    }

    async fn get_user(&self, chat_id: &str) -> Result<Option<users::User>, ServiceError> {
        self.repository
            .get_user(chat_id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    // Wallet provisioning failure leaves the user in place; there is no
    // rollback, only the error log.
    async fn provision_wallet(&self, chat_id: &str) {
        let (wallet_tx, wallet_rx) = oneshot::channel();

        let sent = self
            .wallet_channel
            .send(WalletRequest::GetOrCreate {
                chat_id: chat_id.to_string(),
                response: wallet_tx,
            })
            .await;

        if sent.is_err() {
            log::error!("Could not reach wallet service for {}.", chat_id);
            return;
        }

        match wallet_rx.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => log::error!("Could not provision wallet for {}: {}", chat_id, e),
            Err(e) => log::error!("Wallet service dropped request for {}: {}", chat_id, e),
        }
    }

    async fn link_invitee(&self, code: &str, invitee: &users::User) {
        let inviter = match self.repository.get_user_by_referral_code(code).await {
            Ok(inviter) => inviter,
            Err(e) => {
                log::error!("Could not resolve inviter for code {}: {}", code, e);
                return;
            }
        };

        // onboarding is never blocked by a bad invite code
        let Some(inviter) = inviter else {
            log::debug!("Ignoring unknown invite code {}.", code);
            return;
        };

        let request = ReferralRequest::LinkInvitee {
            inviter_chat_id: inviter.chat_id,
            inviter_code: inviter.referral_code,
            invitee_id: invitee.chat_id.clone(),
            invitee_username: invitee.username.clone(),
        };

        if self.referral_channel.send(request).await.is_err() {
            log::error!("Could not reach referral service for {}.", invitee.chat_id);
        }
    }
}

#[async_trait]
impl RequestHandler<UserRequest> for UserRequestHandler {
    async fn handle_request(&self, request: UserRequest) {
        match request {
            UserRequest::Identify {
                chat_id,
                username,
                avatar,
                response,
            } => {
                let user = self.identify(&chat_id, &username, &avatar).await;
                let _ = response.send(user);
            }
            UserRequest::IdentifyFromReferral {
                chat_id,
                username,
                avatar,
                invite_code,
                response,
            } => {
                let user = self
                    .identify_from_referral(&chat_id, &username, &avatar, invite_code)
                    .await;
                let _ = response.send(user);
            }
            UserRequest::GetUser { chat_id, response } => {
                let user = self.get_user(&chat_id).await;
                let _ = response.send(user);
            }
        }
    }
}

pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        UserService {}
    }
}

#[async_trait]
impl Service<UserRequest, UserRequestHandler> for UserService {}
