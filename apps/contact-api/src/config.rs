//! # アプリケーション設定
//!
//! 環境変数から contact-api の設定を読み込む。
//! 起動時に一度だけ構築し、ハンドラには状態として渡す（ハンドラ内で環境変数を読まない）。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `CONTACT_API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `CONTACT_API_PORT` | No | `3000` | ポート番号 |
//! | `CONTACT_ALLOWED_ORIGIN` | No | - | CORS で許可するオリジン |
//! | `MAIL_RELAY_BACKEND` | No | `smtp` | `smtp` または `noop` |
//! | `EMAIL_USER` | No* | - | リレーのアカウント識別子（送信元） |
//! | `EMAIL_PASS` | No* | - | リレーのアカウントシークレット |
//! | `CONTACT_RECIPIENT` | No | `EMAIL_USER` | お問い合わせの宛先 |
//! | `CONTACT_SUBJECT_PREFIX` | No | `Portfolio Contact: ` | 件名の接頭辞 |
//! | `RELAY_SERVICE` | No | - | プロバイダ名（`gmail`, `outlook` 等）。指定時は `RELAY_HOST` 等より優先 |
//! | `RELAY_HOST` | No | `smtp-mail.outlook.com` | SMTP ホスト |
//! | `RELAY_PORT` | No | `587` | SMTP ポート |
//! | `RELAY_SECURITY` | No | `starttls` | `starttls` / `tls` / `none` |
//! | `RELAY_TIMEOUT_SECS` | No | `30` | SMTP コマンドのタイムアウト（秒） |
//!
//! \* 認証情報が未設定でも起動は継続する。最初の送信時に接続確認が失敗し、500 が返る。

use std::{env, str::FromStr, time::Duration};

use axum::http::HeaderValue;
use contact_relay_infra::{RelayEndpoint, SmtpRelayConfig, TransportSecurity};
use thiserror::Error;

/// 件名接頭辞のデフォルト
pub const DEFAULT_SUBJECT_PREFIX: &str = "Portfolio Contact: ";

/// 設定の読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 値の形式が不正
    #[error("{key} の値 {value:?} が不正です: {reason}")]
    InvalidValue {
        key:    &'static str,
        value:  String,
        reason: String,
    },
}

/// HTTP サーバー設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// バインドアドレス
    pub host:           String,
    /// ポート番号
    pub port:           u16,
    /// CORS で許可するオリジン（未設定なら CORS ヘッダーを付けない）
    pub allowed_origin: Option<HeaderValue>,
}

/// リレーの実装種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RelayBackend {
    /// SMTP リレー経由で送信する
    #[default]
    Smtp,
    /// 送信せずログ出力のみ
    Noop,
}

/// リレー設定
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub backend: RelayBackend,
    pub smtp:    SmtpRelayConfig,
}

/// 送信メッセージのアドレスと件名の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageConfig {
    /// 送信元（リレーのアカウント）
    pub sender:         String,
    /// 宛先（サイト所有者）
    pub recipient:      String,
    /// 件名の接頭辞
    pub subject_prefix: String,
}

/// アプリケーション全体の設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server:  ServerConfig,
    pub relay:   RelayConfig,
    pub message: MessageConfig,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    ///
    /// テストで環境変数を書き換えずに済むよう、参照元を差し替え可能にしている。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空文字列は未設定と同じ扱い
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server = ServerConfig {
            host:           get("CONTACT_API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port:           parse_or("CONTACT_API_PORT", get("CONTACT_API_PORT"), 3000)?,
            allowed_origin: get("CONTACT_ALLOWED_ORIGIN")
                .map(|origin| {
                    HeaderValue::from_str(&origin).map_err(|e| ConfigError::InvalidValue {
                        key:    "CONTACT_ALLOWED_ORIGIN",
                        value:  origin.clone(),
                        reason: e.to_string(),
                    })
                })
                .transpose()?,
        };

        let endpoint = match get("RELAY_SERVICE") {
            Some(name) => {
                RelayEndpoint::from_service_name(&name).map_err(|e| ConfigError::InvalidValue {
                    key:    "RELAY_SERVICE",
                    value:  name.clone(),
                    reason: e.to_string(),
                })?
            }
            None => RelayEndpoint::Explicit {
                host:     get("RELAY_HOST").unwrap_or_else(|| "smtp-mail.outlook.com".to_string()),
                port:     parse_or("RELAY_PORT", get("RELAY_PORT"), 587)?,
                security: parse_or(
                    "RELAY_SECURITY",
                    get("RELAY_SECURITY"),
                    TransportSecurity::StartTls,
                )?,
            },
        };

        let username = get("EMAIL_USER");
        let relay = RelayConfig {
            backend: parse_or(
                "MAIL_RELAY_BACKEND",
                get("MAIL_RELAY_BACKEND"),
                RelayBackend::Smtp,
            )?,
            smtp:    SmtpRelayConfig {
                endpoint,
                username: username.clone(),
                password: get("EMAIL_PASS"),
                timeout: Duration::from_secs(parse_or(
                    "RELAY_TIMEOUT_SECS",
                    get("RELAY_TIMEOUT_SECS"),
                    30,
                )?),
            },
        };

        let sender = username.unwrap_or_default();
        let message = MessageConfig {
            recipient:      get("CONTACT_RECIPIENT").unwrap_or_else(|| sender.clone()),
            sender,
            // 接頭辞は末尾の空白に意味があるので get を通さない
            subject_prefix: lookup("CONTACT_SUBJECT_PREFIX")
                .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string()),
        };

        Ok(Self {
            server,
            relay,
            message,
        })
    }

    /// リレーの認証情報がそろっているか
    pub fn has_relay_credentials(&self) -> bool {
        self.relay.smtp.username.is_some() && self.relay.smtp.password.is_some()
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
