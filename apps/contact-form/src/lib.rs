//! # お問い合わせフォームコントローラ
//!
//! 画面側でフォームの入力値と送信状態を管理するライブラリ。
//! 画面（UI シェル）は項目の更新と送信を呼び出し、
//! [`SubmissionOutcome`] の変化を購読してステータス表示を切り替える。
//!
//! ## モジュール構成
//!
//! - [`client`]: contact-api への HTTP クライアント
//! - [`config`]: エンドポイント・タイムアウト・自動リセット間隔
//! - [`controller`]: 入力値と送信状態の管理

pub mod client;
pub mod config;
pub mod controller;

pub use client::{ClientError, ContactApiClient, ContactApiClientImpl};
pub use config::{ConfigError, ContactFormConfig};
pub use controller::{FormController, SubmissionOutcome};
