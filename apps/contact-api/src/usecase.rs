//! # ユースケース
//!
//! - `contact`: お問い合わせの検証・接続確認・送信
//! - `message_renderer`: 送信メッセージの件名と本文の生成

pub mod contact;
pub mod message_renderer;

pub use contact::ContactUseCase;
pub use message_renderer::MessageRenderer;
