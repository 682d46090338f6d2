//! # お問い合わせ送信ペイロード
//!
//! フォームから送信される 4 項目（名前・メールアドレス・件名・本文）を表す。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 |
//! |---|------------|
//! | [`SubmissionPayload`] | 送信ペイロード |
//! | [`FormField`] | フォーム項目 |
//! | [`ValidationError`] | 必須項目の欠落 |
//!
//! ## 設計方針
//!
//! - **検証ルールの共有**: クライアントとサーバーが同じ [`SubmissionPayload::validate`] を使う
//! - **空白のみは未入力扱い**: `"   "` は空文字列と同じく欠落とみなす
//! - **欠落キーと null は空文字列**: JSON のキー欠落や `null` はデシリアライズ時に空文字列になり、
//!   検証で 400 として扱われる

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// フォーム項目
///
/// HTML の `name` 属性（snake_case）と相互変換できる。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    /// フォーム上の表示順に並べた全項目
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Subject,
        FormField::Message,
    ];
}

/// 必須項目の欠落
///
/// 欠落した項目をフォーム上の順序で保持する。空になることはない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required fields: {}", join_fields(.missing))]
pub struct ValidationError {
    missing: Vec<FormField>,
}

impl ValidationError {
    /// 欠落した項目
    pub fn missing(&self) -> &[FormField] {
        &self.missing
    }
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| <&'static str>::from(*f))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 送信ペイロード
///
/// フォームの入力値そのもの。入力のたびに項目単位で上書きされ、
/// 送信時にスナップショットが取られる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name:    String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email:   String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl SubmissionPayload {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name:    name.into(),
            email:   email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// 項目の現在値
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
        }
    }

    /// 項目を上書きする（後勝ち）
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Subject => &mut self.subject,
            FormField::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// 未入力の項目をフォーム順で返す
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }

    /// 必須項目を検証する
    ///
    /// # Errors
    ///
    /// 1 項目でも未入力なら [`ValidationError`] を返す。
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// 全項目を空文字列に戻す
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 全項目が空文字列か
    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| self.field(*f).is_empty())
    }
}
