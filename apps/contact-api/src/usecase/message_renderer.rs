//! # メッセージレンダラー
//!
//! tera テンプレートエンジンでお問い合わせメールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **HTML は自動エスケープ**: `.html` テンプレートは tera の autoescape 対象。
//!   訪問者の入力がそのままマークアップとして解釈されることはない
//! - **件名パターン**: `{接頭辞}{送信された件名}`。改行はヘッダー分割を防ぐため空白に置き換える

use contact_relay_domain::{contact::SubmissionPayload, mail::OutboundMessage};
use tera::{Context, Tera};

use crate::config::MessageConfig;

const HTML_TEMPLATE: &str = "contact_message.html";
const TEXT_TEMPLATE: &str = "contact_message.txt";

/// メッセージレンダラー
pub struct MessageRenderer {
    engine: Tera,
}

impl MessageRenderer {
    /// 埋め込みテンプレートを登録してレンダラーを作る
    pub fn new() -> Result<Self, tera::Error> {
        let mut engine = Tera::default();

        engine.add_raw_templates(vec![
            (
                HTML_TEMPLATE,
                include_str!("../../templates/contact_message.html"),
            ),
            (
                TEXT_TEMPLATE,
                include_str!("../../templates/contact_message.txt"),
            ),
        ])?;

        Ok(Self { engine })
    }

    /// 送信ペイロードから送信メッセージを組み立てる
    pub fn render(
        &self,
        payload: &SubmissionPayload,
        config: &MessageConfig,
    ) -> Result<OutboundMessage, tera::Error> {
        let mut context = Context::new();
        context.insert("name", &payload.name);
        context.insert("email", &payload.email);
        context.insert("subject", &payload.subject);
        context.insert("message", &payload.message);

        let html_body = self.engine.render(HTML_TEMPLATE, &context)?;
        let text_body = self.engine.render(TEXT_TEMPLATE, &context)?;

        Ok(OutboundMessage {
            from: config.sender.clone(),
            to: config.recipient.clone(),
            reply_to: payload.email.trim().to_string(),
            subject: format!(
                "{}{}",
                config.subject_prefix,
                fold_line_breaks(&payload.subject)
            ),
            text_body,
            html_body,
        })
    }
}

/// CR / LF を空白に置き換える
fn fold_line_breaks(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect()
}
