//! SMTP リレー実装
//!
//! lettre の `AsyncSmtpTransport` を使用して接続確認とメール送信を行う。
//! トランスポートは操作ごとに組み立て、接続を使い回さない。
//! 証明書検証は常に有効で、緩和するオプションは提供しない。

use std::time::Duration;

use async_trait::async_trait;
use contact_relay_domain::mail::{OutboundMessage, RelayError, RelayReceipt};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::{MailRelay, RelayEndpoint, TransportSecurity};

/// SMTP リレーの設定
#[derive(Clone)]
pub struct SmtpRelayConfig {
    /// 接続先
    pub endpoint: RelayEndpoint,
    /// リレーのアカウント識別子（ユーザー名）
    pub username: Option<String>,
    /// リレーのアカウントシークレット
    pub password: Option<String>,
    /// SMTP コマンドのタイムアウト
    pub timeout:  Duration,
}

impl std::fmt::Debug for SmtpRelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpRelayConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// SMTP リレー
pub struct SmtpMailRelay {
    config: SmtpRelayConfig,
}

impl SmtpMailRelay {
    pub fn new(config: SmtpRelayConfig) -> Self {
        Self { config }
    }

    fn credentials(&self) -> Result<Credentials, RelayError> {
        match (&self.config.username, &self.config.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Ok(Credentials::new(user.clone(), pass.clone()))
            }
            _ => Err(RelayError::Configuration(
                "EMAIL_USER と EMAIL_PASS の両方が必要です".to_string(),
            )),
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, RelayError> {
        let credentials = self.credentials()?;
        let (host, port, security) = self.config.endpoint.resolve();

        let builder = match security {
            TransportSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| RelayError::Configuration(format!("TLS 設定失敗: {e}")))?
            }
            TransportSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| RelayError::Configuration(format!("TLS 設定失敗: {e}")))?,
            TransportSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            }
        };

        Ok(builder
            .port(port)
            .credentials(credentials)
            .timeout(Some(self.config.timeout))
            .build())
    }
}

fn parse_mailbox(address: &str, label: &str) -> Result<Mailbox, RelayError> {
    address
        .parse()
        .map_err(|e| RelayError::Configuration(format!("{label}アドレス不正: {e}")))
}

fn build_message(message: &OutboundMessage) -> Result<Message, RelayError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&message.from, "送信元")?)
        .to(parse_mailbox(&message.to, "宛先")?)
        .subject(&message.subject);

    // 返信先は訪問者の入力値。形式が不正でも本文は届けたいので、ヘッダーだけ省く
    match message.reply_to.parse::<Mailbox>() {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(e) => {
            tracing::warn!(
                reply_to = %message.reply_to,
                error = %e,
                "返信先アドレスが不正なため Reply-To を省略します"
            );
        }
    }

    builder
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(message.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(message.html_body.clone()),
                ),
        )
        .map_err(|e| RelayError::SendFailed(format!("メッセージ構築失敗: {e}")))
}

#[async_trait]
impl MailRelay for SmtpMailRelay {
    async fn verify(&self) -> Result<(), RelayError> {
        let transport = self.transport()?;

        match transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(RelayError::Verification(format!(
                "{} が接続確認に応答しませんでした",
                self.config.endpoint
            ))),
            Err(e) => Err(RelayError::Verification(e.to_string())),
        }
    }

    async fn send(&self, message: &OutboundMessage) -> Result<RelayReceipt, RelayError> {
        let email = build_message(message)?;
        let transport = self.transport()?;

        let response = transport
            .send(email)
            .await
            .map_err(|e| RelayError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        let text = response.message().collect::<Vec<_>>().join(" ");
        let acknowledgment = if text.is_empty() {
            None
        } else {
            Some(format!("{} {}", response.code(), text))
        };

        Ok(RelayReceipt { acknowledgment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(username: Option<&str>, password: Option<&str>) -> SmtpRelayConfig {
        SmtpRelayConfig {
            endpoint: RelayEndpoint::Explicit {
                host:     "localhost".to_string(),
                port:     1025,
                security: TransportSecurity::None,
            },
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            timeout:  Duration::from_secs(1),
        }
    }

    fn message(reply_to: &str) -> OutboundMessage {
        OutboundMessage {
            from:      "relay@example.com".to_string(),
            to:        "owner@example.com".to_string(),
            reply_to:  reply_to.to_string(),
            subject:   "Portfolio Contact: Hello".to_string(),
            text_body: "Hi there".to_string(),
            html_body: "<p>Hi there</p>".to_string(),
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailRelay>();
    }

    #[tokio::test]
    async fn 認証情報が未設定ならverifyは接続前に設定エラーを返す() {
        let relay = SmtpMailRelay::new(config(Some("relay@example.com"), None));

        let result = relay.verify().await;

        assert!(matches!(result, Err(RelayError::Configuration(_))));
    }

    #[tokio::test]
    async fn 空の認証情報も未設定として扱う() {
        let relay = SmtpMailRelay::new(config(Some(""), Some("")));

        assert!(matches!(
            relay.verify().await,
            Err(RelayError::Configuration(_))
        ));
    }

    #[test]
    fn 返信先ヘッダーに送信者のアドレスが入る() {
        let email = build_message(&message("ada@example.com")).unwrap();
        let headers = email.headers().to_string();

        assert!(headers.contains("Reply-To: ada@example.com"));
        assert!(headers.contains("To: owner@example.com"));
    }

    #[test]
    fn 返信先が不正でもメッセージは組み立てられる() {
        let email = build_message(&message("not an address")).unwrap();

        assert!(!email.headers().to_string().contains("Reply-To"));
    }

    #[test]
    fn 送信元アドレスが不正なら設定エラー() {
        let mut msg = message("ada@example.com");
        msg.from = "broken".to_string();

        assert!(matches!(
            build_message(&msg),
            Err(RelayError::Configuration(_))
        ));
    }

    #[test]
    fn パスワードはdebug出力に含まれない() {
        let debug = format!("{:?}", config(Some("relay@example.com"), Some("s3cret")));

        assert!(!debug.contains("s3cret"));
    }
}
