use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::{mpsc, oneshot};

use super::users::UserRequest;
use super::{RequestHandler, Service, ServiceError};
use crate::repositories::referrals::ReferralRepository;
use crate::settings;
use crate::{models::referrals, models::users};

pub enum ReferralRequest {
    LinkInvitee {
        inviter_chat_id: String,
        inviter_code: String,
        invitee_id: String,
        invitee_username: String,
    },
    Summary {
        chat_id: String,
        response: oneshot::Sender<Result<referrals::ReferralSummary, ServiceError>>,
    },
    ListReferred {
        chat_id: String,
        limit: i64,
        offset: i64,
        response: oneshot::Sender<Result<(Vec<referrals::ReferredUser>, i64), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct ReferralRequestHandler {
    repository: ReferralRepository,
    user_channel: mpsc::Sender<UserRequest>,
    settings: settings::Referral,
}

impl ReferralRequestHandler {
    pub fn new(
        sql_conn: PgPool,
        user_channel: mpsc::Sender<UserRequest>,
        settings: settings::Referral,
    ) -> Self {
        let repository = ReferralRepository::new(sql_conn);

        ReferralRequestHandler {
            repository,
            user_channel,
            settings,
        }
    }

    async fn link_invitee(
        &self,
        inviter_chat_id: &str,
        inviter_code: &str,
        invitee_id: &str,
        invitee_username: &str,
    ) {
        match self
            .repository
            .link_invitee(inviter_chat_id, inviter_code, invitee_id, invitee_username)
            .await
        {
            Ok(true) => log::info!("Linked {} under {}.", invitee_id, inviter_chat_id),
            Ok(false) => log::debug!("Invitee {} is already referred.", invitee_id),
            Err(e) => log::error!("Could not link {}: {}", invitee_id, e),
        }
    }

    async fn summary(&self, chat_id: &str) -> Result<referrals::ReferralSummary, ServiceError> {
        let user = self.resolve_user(chat_id).await?;

        let Some(user) = user else {
            return Err(ServiceError::NotFound(format!(
                "No user for chat id {}",
                chat_id
            )));
        };

        let referral = self
            .repository
            .get_referral(chat_id)
            .await
            .map_err(|e| ServiceError::Repository("ReferralService".to_string(), e.to_string()))?;

        let (total_referrals, successful_referrals) = self
            .repository
            .count_referred(chat_id)
            .await
            .map_err(|e| ServiceError::Repository("ReferralService".to_string(), e.to_string()))?;

        let (total_earned_in_cents, pending_earned_in_cents) = referral
            .map(|r| (r.total_earned_in_cents, r.pending_earned_in_cents))
            .unwrap_or((0, 0));

        Ok(referrals::ReferralSummary {
            link: build_referral_link(&self.settings.link_base, &user.referral_code),
            referral_code: user.referral_code,
            total_referrals,
            successful_referrals,
            total_earned_in_cents,
            pending_earned_in_cents,
            commission_in_cents: self.settings.commission_in_cents,
        })
    }

    async fn list_referred(
        &self,
        chat_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<referrals::ReferredUser>, i64), ServiceError> {
        self.repository
            .list_referred(chat_id, limit, offset)
            .await
            .map_err(|e| ServiceError::Repository("ReferralService".to_string(), e.to_string()))
    }

    async fn resolve_user(&self, chat_id: &str) -> Result<Option<users::User>, ServiceError> {
        let (user_tx, user_rx) = oneshot::channel();

        self.user_channel
            .send(UserRequest::GetUser {
                chat_id: chat_id.to_string(),
                response: user_tx,
            })
            .await
            .map_err(|e| {
                ServiceError::Communication("Referral => User".to_string(), e.to_string())
            })?;

        user_rx
            .await
            .map_err(|e| {
                ServiceError::Communication("User => Referral".to_string(), e.to_string())
            })?
            .map_err(|e| ServiceError::Internal(format!("Could not resolve {}: {}", chat_id, e)))
    }
}

fn build_referral_link(base: &str, code: &str) -> String {
    format!("{}{}", base, code)
}

#[async_trait]
impl RequestHandler<ReferralRequest> for ReferralRequestHandler {
    async fn handle_request(&self, request: ReferralRequest) {
        match request {
            ReferralRequest::LinkInvitee {
                inviter_chat_id,
                inviter_code,
                invitee_id,
                invitee_username,
            } => {
                self.link_invitee(
                    &inviter_chat_id,
                    &inviter_code,
                    &invitee_id,
                    &invitee_username,
                )
                .await;
            }
            ReferralRequest::Summary { chat_id, response } => {
                let summary = self.summary(&chat_id).await;
                let _ = response.send(summary);
            }
            ReferralRequest::ListReferred {
                chat_id,
                limit,
                offset,
                response,
            } => {
                let referred = self.list_referred(&chat_id, limit, offset).await;
                let _ = response.send(referred);
            }
        }
    }
}

pub struct ReferralService;

impl ReferralService {
    pub fn new() -> Self {
        ReferralService {}
    }
}

#[async_trait]
impl Service<ReferralRequest, ReferralRequestHandler> for ReferralService {}

#[cfg(test)]
mod tests {
    use super::build_referral_link;

    #[test]
    fn referral_link_appends_own_code() {
        assert_eq!(
            build_referral_link("https://t.me/PaisaRewardsBot?start=", "483920"),
            "https://t.me/PaisaRewardsBot?start=483920"
        );
    }
}
