//! # Contact Service サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CONTACT_HOST` | No | バインドアドレス（既定: `0.0.0.0`） |
//! | `CONTACT_PORT` | No | ポート番号（既定: `3000`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp`（既定）または `noop` |
//! | `SMTP_HOST` / `SMTP_PORT` | No | リレー（既定: `smtp.gmail.com:465`） |
//! | `SMTP_TLS` | No | `implicit`（既定）または `none`（ローカルの開発用リレー） |
//! | `EMAIL_USER` / `EMAIL_PASSWORD` | Yes | リレーの認証情報（未設定でも起動するが送信は失敗する） |
//! | `CONTACT_DISPLAY_NAME` | No | 送信者表示名 |
//! | `RUST_LOG` | No | ログレベル（既定: `info,folio=debug`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（既定） |
//!
//! 全項目は `config` モジュールを参照。

use std::{net::SocketAddr, sync::Arc};

use folio_contact_service::{
    app_builder::build_app,
    config::ContactConfig,
    handler::ContactState,
    usecase::ContactDispatcher,
};
use folio_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("contact-service"));
    let _tracing_guard = tracing::info_span!("app", service = "contact-service").entered();

    let config = ContactConfig::from_env()?;

    tracing::info!(
        "Contact Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let dispatcher = ContactDispatcher::from_config(&config.notification)?;
    tracing::info!(
        backend = %config.notification.backend,
        relay = %format!("{}:{}", config.notification.smtp.host, config.notification.smtp.port),
        "通知送信を初期化しました"
    );
    if !dispatcher.is_configured() {
        tracing::warn!("EMAIL_USER / EMAIL_PASSWORD が未設定です。送信リクエストは 500 で失敗します");
    }

    let app = build_app(Arc::new(ContactState { dispatcher }));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Contact Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
