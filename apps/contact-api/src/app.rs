//! # ルーター構築
//!
//! main とテストの両方から同じルーターを組み立てる。

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use contact_relay_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    error::panic_response,
    handler::{ContactState, health_check, submit_contact},
};

/// アプリケーションのルーターを組み立てる
///
/// `allowed_origin` を指定した場合のみ、そのオリジンからの `POST` を CORS で許可する。
pub fn build_router(state: Arc<ContactState>, allowed_origin: Option<HeaderValue>) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/contact", post(submit_contact))
        .with_state(state);

    let router = match allowed_origin {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        None => router,
    };

    // レイヤー順序: 下に書いたものが外側
    // 1. SetRequestIdLayer（最外）: X-Request-Id を生成（クライアント提供値があればそれを使う）
    // 2. TraceLayer: request_id を含むスパンを作る
    // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
    // 4. CatchPanicLayer: ハンドラ内の panic を 500 の JSON に変換
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
