//! # Contact Relay インフラ層
//!
//! 外部のメールリレー（SMTP サーバー）との通信を担当する。
//!
//! ## モジュール構成
//!
//! - [`relay`]: `MailRelay` トレイトと SMTP / Noop 実装、リレー接続先の設定
//! - `mock`: テスト用のモックリレー（`test-utils` feature 有効時のみ）

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod relay;

pub use relay::{
    MailRelay,
    NoopMailRelay,
    RelayEndpoint,
    SmtpMailRelay,
    SmtpRelayConfig,
    TransportSecurity,
    WellKnownService,
};
