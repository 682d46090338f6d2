//! # ヘルスチェックハンドラ
//!
//! リレーへの接続は確認せず、プロセスの稼働状態のみを返す。
//! リレーへの接続確認は送信のたびに行われるため、ここで重ねて行わない。

use axum::Json;
use contact_relay_shared::HealthResponse;

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
