//! # Contact Relay 共有ユーティリティ
//!
//! サーバー（contact-api）とクライアント（contact-form）の両方で使う
//! ワイヤ形式の型と、ロギング初期化を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum に依存しない（`IntoResponse` 変換は各アプリの責務）
//! - トレーシング関連の依存は `observability` feature で有効化する

pub mod contact_response;
pub mod health;
pub mod observability;

pub use contact_response::{ErrorResponse, MessageResponse};
pub use health::HealthResponse;
