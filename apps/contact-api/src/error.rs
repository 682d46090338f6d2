//! # contact-api エラーハンドリング
//!
//! お問い合わせ送信のエラー定義と、axum レスポンスへの変換。
//!
//! ## エラーの分類
//!
//! | ContactError | HTTP Status | 発生フェーズ |
//! |--------------|-------------|--------------|
//! | Validation | 400 | 必須項目の検証 |
//! | RelayVerification | 500 | リレーへの接続・認証確認 |
//! | RelaySend | 500 | 接続確認後の送信 |
//! | Unexpected | 500 | ボディの解析失敗などそれ以外すべて |
//!
//! クライアントには固定文言のみを返し、詳細はログにのみ出力する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contact_relay_domain::{contact::ValidationError, mail::RelayError};
use contact_relay_shared::ErrorResponse;
use thiserror::Error;

/// 接続確認に失敗したときの文言
pub const VERIFICATION_FAILED_MESSAGE: &str = "Failed to connect to email server. Check the relay \
                                               account credentials; providers that disabled basic \
                                               authentication require an app password.";

/// 送信に失敗したときの文言
pub const SEND_FAILED_MESSAGE: &str = "Email server rejected the message. Please try again later.";

/// 予期しないエラーの文言
pub const UNEXPECTED_MESSAGE: &str = "Failed to process the request. Please try again later.";

/// お問い合わせ送信で発生するエラー
#[derive(Debug, Error)]
pub enum ContactError {
    /// 必須項目の欠落（400 Bad Request）
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// リレーへの接続・認証確認に失敗（500）
    #[error("リレーの接続確認に失敗しました: {0}")]
    RelayVerification(#[source] RelayError),

    /// リレーでの送信に失敗（500）
    #[error("リレーでの送信に失敗しました: {0}")]
    RelaySend(#[source] RelayError),

    /// 予期しないエラー（500）
    #[error("リクエストの処理に失敗しました: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ContactError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ContactError::RelayVerification(err) => {
                tracing::error!(
                    error.category = "external_service",
                    error.kind = "relay_verification",
                    stage = "validated",
                    "リレーの接続確認に失敗: {}",
                    err
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    VERIFICATION_FAILED_MESSAGE.to_string(),
                )
            }
            ContactError::RelaySend(err) => {
                tracing::error!(
                    error.category = "external_service",
                    error.kind = "relay_send",
                    stage = "connection_verified",
                    "リレーでの送信に失敗: {}",
                    err
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SEND_FAILED_MESSAGE.to_string(),
                )
            }
            ContactError::Unexpected(err) => {
                tracing::error!(
                    error.category = "internal",
                    error.kind = "unexpected",
                    "リクエスト処理で内部エラー: {:?}",
                    err
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// ハンドラ内の panic を 500 に変換する
///
/// `CatchPanicLayer::custom` に渡す。
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!(
        error.category = "internal",
        error.kind = "panic",
        "ハンドラで panic が発生しました"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(UNEXPECTED_MESSAGE)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use contact_relay_domain::contact::SubmissionPayload;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_検証エラーは400と欠落項目を返す() {
        let err = SubmissionPayload::default().validate().unwrap_err();

        let response = ContactError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Missing required fields: name, email, subject, message"
        );
    }

    #[tokio::test]
    async fn test_接続確認と送信の失敗は異なる文言になる() {
        let verify = ContactError::RelayVerification(RelayError::Verification("auth".into()))
            .into_response();
        let send = ContactError::RelaySend(RelayError::SendFailed("550".into())).into_response();

        assert_eq!(verify.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(send.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(verify).await["error"], VERIFICATION_FAILED_MESSAGE);
        assert_eq!(body_json(send).await["error"], SEND_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_内部エラーの詳細はレスポンスに含めない() {
        let response =
            ContactError::Unexpected(anyhow::anyhow!("secret stack detail")).into_response();

        let json = body_json(response).await;
        assert_eq!(json["error"], UNEXPECTED_MESSAGE);
        assert!(!json.to_string().contains("secret"));
    }
}
