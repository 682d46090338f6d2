//! # メールリレー
//!
//! お問い合わせメールを外部の SMTP リレー経由で送信するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailRelay` trait で接続確認と送信を抽象化
//! - **2 つの実装**: SMTP（lettre）、Noop（ログ出力のみ）
//! - **接続先は設定で切替**: ホスト/ポート直接指定と、名前付きプロバイダ指定の両方を
//!   [`RelayEndpoint`] で表現し、呼び出し側からは区別しない
//! - **リクエスト単位の接続**: 接続はプールせず、操作ごとに確立して破棄する

mod endpoint;
mod noop;
mod smtp;

use async_trait::async_trait;
use contact_relay_domain::mail::{OutboundMessage, RelayError, RelayReceipt};
pub use endpoint::{RelayEndpoint, TransportSecurity, WellKnownService};
pub use noop::NoopMailRelay;
pub use smtp::{SmtpMailRelay, SmtpRelayConfig};

/// メールリレートレイト
///
/// 送信前の接続確認（verify）と送信（send）を分けて提供する。
/// 両者の失敗は呼び出し側で別のエラーとして扱われる。
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// リレーへの接続と認証を確認する
    async fn verify(&self) -> Result<(), RelayError>;

    /// メッセージを送信する
    async fn send(&self, message: &OutboundMessage) -> Result<RelayReceipt, RelayError>;
}
