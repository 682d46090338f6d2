//! # お問い合わせ API のレスポンスボディ
//!
//! `POST /api/contact` が返す JSON の形。
//!
//! - 成功: `{ "message": string, "info"?: string }`
//! - 失敗: `{ "error": string }`
//!
//! サーバーは Serialize、フォームコントローラは Deserialize で使う。

use serde::{Deserialize, Serialize};

/// 送信成功時の定型メッセージ
pub const EMAIL_SENT_MESSAGE: &str = "Email sent successfully";

/// 成功レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    /// リレーの応答テキスト（ある場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info:    Option<String>,
}

impl MessageResponse {
    /// 送信成功レスポンス
    pub fn email_sent(info: Option<String>) -> Self {
        Self {
            message: EMAIL_SENT_MESSAGE.to_string(),
            info,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
