//! Authentication provider implementation.
//!
//! This module implements the [`AuthProvider`] trait for [`ReqwestClient`].

use std::time::Instant;

use taskdesk_core::{AuthProvider, LoginRequest, LoginResponse};

use crate::client::{ReqwestClient, TRACING_TARGET};
use crate::error::Error;
use crate::wire::{LoginBody, LoginRecord};

#[async_trait::async_trait]
impl AuthProvider for ReqwestClient {
    async fn authenticate(&self, request: &LoginRequest) -> taskdesk_core::Result<LoginResponse> {
        let started_at = Instant::now();
        let result = async {
            let url = self.endpoint(["auth", "login"])?;
            let body = LoginBody {
                username: &request.username,
                password: &request.password,
            };
            let record: LoginRecord = self.send_json(self.http().post(url).json(&body)).await?;
            Ok::<_, Error>(LoginResponse::from(record))
        }
        .await;

        tracing::debug!(
            target: TRACING_TARGET,
            success = result.is_ok(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Login request completed"
        );

        result.map_err(|error| {
            let message = match &error {
                Error::Status {
                    message: Some(message),
                    ..
                } => message.clone(),
                Error::Status { status, .. } if status.is_client_error() => {
                    "Invalid username or password".to_owned()
                }
                other => other.to_string(),
            };
            taskdesk_core::Error::authentication()
                .with_message(message)
                .with_source(taskdesk_core::Error::from(error))
        })
    }
}
