//! Noop リレー実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ローカル開発やリレー無効化時に使用する。

use async_trait::async_trait;
use contact_relay_domain::mail::{OutboundMessage, RelayError, RelayReceipt};

use super::MailRelay;

/// Noop リレー（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMailRelay;

#[async_trait]
impl MailRelay for NoopMailRelay {
    async fn verify(&self) -> Result<(), RelayError> {
        Ok(())
    }

    async fn send(&self, message: &OutboundMessage) -> Result<RelayReceipt, RelayError> {
        tracing::info!(
            to = %message.to,
            reply_to = %message.reply_to,
            subject = %message.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(RelayReceipt::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifyとsendがエラーを返さない() {
        let relay = NoopMailRelay;
        let message = OutboundMessage {
            from:      "relay@example.com".to_string(),
            to:        "owner@example.com".to_string(),
            reply_to:  "ada@example.com".to_string(),
            subject:   "テスト件名".to_string(),
            text_body: "テスト".to_string(),
            html_body: "<p>テスト</p>".to_string(),
        };

        assert!(relay.verify().await.is_ok());
        assert_eq!(relay.send(&message).await, Ok(RelayReceipt::default()));
    }
}
