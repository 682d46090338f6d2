//! # HTTP リクエストハンドラ
//!
//! - `contact`: お問い合わせ送信（`POST /api/contact`）
//! - `health`: ヘルスチェック（`GET /health`）

pub mod contact;
pub mod health;

pub use contact::{ContactState, submit_contact};
pub use health::health_check;
