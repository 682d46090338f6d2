//! # お問い合わせユースケース
//!
//! 1 リクエストを次の段階で処理する。どの段階からでもエラーで打ち切られる。
//!
//! ```text
//! Received → Validated → ConnectionVerified → Sent → Responded
//! ```
//!
//! - 検証に失敗した場合、リレーには一切接続しない
//! - リレーへの試行は 1 回のみ（再試行・キューイングはしない）

use std::sync::Arc;

use contact_relay_domain::{contact::SubmissionPayload, mail::RelayReceipt};
use contact_relay_infra::MailRelay;

use super::MessageRenderer;
use crate::{config::MessageConfig, error::ContactError};

/// お問い合わせユースケース
pub struct ContactUseCase {
    relay:    Arc<dyn MailRelay>,
    renderer: MessageRenderer,
    config:   MessageConfig,
}

impl ContactUseCase {
    pub fn new(relay: Arc<dyn MailRelay>, renderer: MessageRenderer, config: MessageConfig) -> Self {
        Self {
            relay,
            renderer,
            config,
        }
    }

    /// お問い合わせを検証し、リレー経由で送信する
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<RelayReceipt, ContactError> {
        payload.validate()?;
        tracing::debug!(stage = "validated", "必須項目の検証を通過");

        self.relay
            .verify()
            .await
            .map_err(ContactError::RelayVerification)?;
        tracing::debug!(stage = "connection_verified", "リレーの接続確認に成功");

        let message = self
            .renderer
            .render(payload, &self.config)
            .map_err(|e| ContactError::Unexpected(e.into()))?;

        let receipt = self
            .relay
            .send(&message)
            .await
            .map_err(ContactError::RelaySend)?;
        tracing::info!(
            stage = "sent",
            subject = %message.subject,
            "お問い合わせメールを送信しました"
        );

        Ok(receipt)
    }
}
