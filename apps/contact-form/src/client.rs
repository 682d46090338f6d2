//! # contact-api クライアント
//!
//! フォームコントローラから contact-api への通信を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /api/contact` - お問い合わせの送信
//!
//! ## 再送の方針
//!
//! 接続そのものに失敗した場合に限り 1 回だけ再送する（設定で無効化可能）。
//! レスポンスを受け取った後の失敗やタイムアウトは、サーバー側で送信済みの可能性があるため再送しない。

use async_trait::async_trait;
use contact_relay_domain::contact::SubmissionPayload;
use contact_relay_shared::{ErrorResponse, MessageResponse};
use thiserror::Error;

use crate::config::ContactFormConfig;

/// サーバーがエラー文を返さなかったときの文言
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to send message";

/// クライアントエラー
///
/// `Display` はそのまま画面のエラー表示に使われる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// サーバーが失敗ステータスを返した（本文の `error` または汎用文言）
    #[error("{0}")]
    Rejected(String),

    /// サーバーに接続できなかった
    #[error("Could not reach the server: {0}")]
    Connect(String),

    /// タイムアウト
    #[error("The request timed out. Please try again.")]
    Timeout,

    /// その他のネットワークエラー
    #[error("{0}")]
    Network(String),

    /// 成功ステータスだが本文を解釈できなかった
    #[error("Unexpected response from the server: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connect(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// contact-api クライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait ContactApiClient: Send + Sync {
    /// お問い合わせを送信する
    async fn submit(&self, payload: &SubmissionPayload) -> Result<MessageResponse, ClientError>;
}

/// contact-api クライアント実装
pub struct ContactApiClientImpl {
    endpoint:               String,
    client:                 reqwest::Client,
    retry_on_connect_error: bool,
}

impl ContactApiClientImpl {
    /// 設定からクライアントを作成する
    ///
    /// # Errors
    ///
    /// HTTP クライアントの初期化（TLS バックエンド等）に失敗した場合。
    pub fn new(config: &ContactFormConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            retry_on_connect_error: config.retry_on_connect_error,
        })
    }

    async fn post(&self, payload: &SubmissionPayload) -> Result<reqwest::Response, reqwest::Error> {
        self.client.post(&self.endpoint).json(payload).send().await
    }
}

/// 接続失敗のときだけ 1 回再試行する
///
/// `enabled` が偽、または `is_connect` が偽を返すエラーでは再試行しない。
async fn retry_once_on_connect<T, E, F, Fut>(
    enabled: bool,
    is_connect: impl Fn(&E) -> bool,
    mut attempt: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match attempt().await {
        Err(e) if enabled && is_connect(&e) => {
            tracing::warn!(error = %e, "contact-api に接続できないため 1 回だけ再送します");
            attempt().await
        }
        result => result,
    }
}

#[async_trait]
impl ContactApiClient for ContactApiClientImpl {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<MessageResponse, ClientError> {
        let response = retry_once_on_connect(
            self.retry_on_connect_error,
            reqwest::Error::is_connect,
            || self.post(payload),
        )
        .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice::<MessageResponse>(&body)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()));
        }

        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .ok()
            .map(|r| r.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

        tracing::debug!(status = %status, error = %message, "contact-api が失敗を返しました");
        Err(ClientError::Rejected(message))
    }
}
