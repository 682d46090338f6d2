//! # Contact Relay ドメイン層
//!
//! お問い合わせフォームの送信パイプラインで共有されるドメインモデルを定義する。
//! フォームコントローラ（クライアント側）とメールリレーハンドラ（サーバー側）の
//! 両方から依存され、必須項目の検証ルールを一箇所に集約する。
//!
//! ## モジュール構成
//!
//! - [`contact`]: 送信ペイロード、フォーム項目、バリデーションエラー
//! - [`mail`]: リレーへ渡す送信メッセージ、リレーエラー、受領結果

pub mod contact;
pub mod mail;
