//! # contact-api サーバー
//!
//! お問い合わせフォームの送信を受け付ける API サーバー。
//!
//! ## 役割
//!
//! - **再検証**: クライアントと同じ規則で必須項目を検証する
//! - **接続確認**: 送信前にリレーへの接続と認証を確認する
//! - **送信**: サイト所有者宛てに 1 通だけ送信し、返信先を訪問者に設定する
//!
//! 環境変数は [`contact_relay_api::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p contact-relay-api
//!
//! # リレーを使わずに動作確認
//! MAIL_RELAY_BACKEND=noop cargo run -p contact-relay-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use contact_relay_api::{
    app::build_router,
    config::{AppConfig, RelayBackend},
    handler::ContactState,
    usecase::{ContactUseCase, MessageRenderer},
};
use contact_relay_infra::{MailRelay, NoopMailRelay, SmtpMailRelay};
use contact_relay_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. リレーとユースケースの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let _tracing_guard = init_tracing(TracingConfig::from_env("contact-api"));

    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "contact-api を起動します: {}:{}",
        config.server.host,
        config.server.port
    );

    let relay: Arc<dyn MailRelay> = match config.relay.backend {
        RelayBackend::Smtp => {
            if !config.has_relay_credentials() {
                tracing::warn!(
                    "EMAIL_USER / EMAIL_PASS が未設定です。送信時の接続確認は失敗します"
                );
            }
            tracing::info!(endpoint = %config.relay.smtp.endpoint, "SMTP リレーを使用します");
            Arc::new(SmtpMailRelay::new(config.relay.smtp.clone()))
        }
        RelayBackend::Noop => {
            tracing::warn!("Noop リレーを使用します。メールは送信されません");
            Arc::new(NoopMailRelay)
        }
    };

    let renderer = MessageRenderer::new().context("メールテンプレートの読み込みに失敗しました")?;
    let state = Arc::new(ContactState {
        usecase: ContactUseCase::new(relay, renderer, config.message.clone()),
    });

    let app = build_router(state, config.server.allowed_origin.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("contact-api が起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Ctrl+C を待つ
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("シグナルの待ち受けに失敗しました: {}", e);
    }
    tracing::info!("シャットダウンします");
}
