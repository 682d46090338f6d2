//! # お問い合わせハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/contact` - お問い合わせの送信
//!
//! ボディは axum の `Json` 抽出器を使わず自前で解析する。
//! 解析失敗を抽出器の 400/422 ではなく、他の想定外エラーと同じ 500 にそろえるため。

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use contact_relay_domain::contact::SubmissionPayload;
use contact_relay_shared::MessageResponse;

use crate::{error::ContactError, usecase::ContactUseCase};

/// お問い合わせハンドラの共有状態
pub struct ContactState {
    pub usecase: ContactUseCase,
}

/// POST /api/contact
///
/// 成功時は `200 { "message": "Email sent successfully", "info"?: string }` を返す。
pub async fn submit_contact(
    State(state): State<Arc<ContactState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ContactError> {
    let payload: SubmissionPayload =
        serde_json::from_slice(&body).map_err(|e| ContactError::Unexpected(e.into()))?;
    tracing::debug!(stage = "received", "お問い合わせを受信");

    let receipt = state.usecase.submit(&payload).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::email_sent(receipt.acknowledgment)),
    ))
}
