//! # contact-api ライブラリ
//!
//! お問い合わせフォームの送信を受け付け、SMTP リレー経由でサイト所有者に転送する
//! API サーバーのコアモジュール。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Contact Form │────▶│ contact-api  │────▶│  SMTP Relay  │
//! │  (browser)   │     │  port: 3000  │     │  (external)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`app`]: ルーター構築
//! - [`config`]: 環境変数からの設定読み込み
//! - [`error`]: エラー定義と HTTP レスポンスへの変換
//! - [`handler`]: HTTP ハンドラ
//! - [`usecase`]: 検証・接続確認・送信の手順とメッセージ生成

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
