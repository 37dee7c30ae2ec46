use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::{models::upi, repositories::upi::UpiRepository};

pub enum UpiRequest {
    Upsert {
        chat_id: String,
        vpa: Option<String>,
        bank_name: Option<String>,
        response: oneshot::Sender<Result<upi::UpiLink, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct UpiRequestHandler {
    repository: UpiRepository,
}

impl UpiRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = UpiRepository::new(sql_conn);

        UpiRequestHandler { repository }
    }

    async fn upsert(
        &self,
        chat_id: &str,
        vpa: Option<String>,
        bank_name: Option<String>,
    ) -> Result<upi::UpiLink, ServiceError> {
        self.repository
            .upsert(chat_id, vpa.as_deref(), bank_name.as_deref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }
}

#[async_trait]
impl RequestHandler<UpiRequest> for UpiRequestHandler {
    async fn handle_request(&self, request: UpiRequest) {
        match request {
            UpiRequest::Upsert {
                chat_id,
                vpa,
                bank_name,
                response,
            } => {
                let link = self.upsert(&chat_id, vpa, bank_name).await;
                let _ = response.send(link);
            }
        }
    }
}

pub struct UpiService;

impl UpiService {
    pub fn new() -> Self {
        UpiService {}
    }
}

#[async_trait]
impl Service<UpiRequest, UpiRequestHandler> for UpiService {}
