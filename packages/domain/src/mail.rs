//! # 送信メール
//!
//! メールリレーへ渡すメッセージと、リレー操作の結果を定義する。
//!
//! ## 設計方針
//!
//! - **宛先と返信先の分離**: `to` は常にサイト所有者、`reply_to` は送信者のアドレス
//! - **フェーズ別エラー**: 接続確認（verify）と送信（send）の失敗を別バリアントで区別する

use thiserror::Error;

/// メールリレー操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// 認証情報の欠落など、接続を試みる前に判明した設定不備
    #[error("リレー設定が不正: {0}")]
    Configuration(String),

    /// 接続・認証の確認に失敗
    #[error("リレーへの接続確認に失敗: {0}")]
    Verification(String),

    /// 接続後の送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// リレーへ渡す送信メッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// 送信元（リレーのアカウント）
    pub from:      String,
    /// 宛先（サイト所有者）
    pub to:        String,
    /// 返信先（フォームの送信者）
    pub reply_to:  String,
    /// 件名
    pub subject:   String,
    /// プレーンテキスト本文
    pub text_body: String,
    /// HTML 本文
    pub html_body: String,
}

/// リレーの受領結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReceipt {
    /// リレーが返した応答テキスト（例: `"250 2.0.0 OK queued"`）
    pub acknowledgment: Option<String>,
}
