//! # フォームコントローラ設定

use std::{env, time::Duration};

use thiserror::Error;

/// 設定の読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 値の形式が不正
    #[error("{key} の値 {value:?} が不正です: {reason}")]
    InvalidValue {
        key:    &'static str,
        value:  String,
        reason: String,
    },
}

/// フォームコントローラの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFormConfig {
    /// 送信先（例: `https://example.com/api/contact`）
    pub endpoint:               String,
    /// 1 リクエストのタイムアウト
    pub request_timeout:        Duration,
    /// 接続自体に失敗した場合に 1 回だけ再送するか
    ///
    /// 接続できなかったリクエストはサーバーに届いていないため、再送しても二重送信にならない。
    pub retry_on_connect_error: bool,
    /// 成功表示から `Idle` に戻るまでの時間
    pub success_reset_after:    Duration,
    /// 失敗表示から `Idle` に戻るまでの時間（エラー文を読む時間を長めに取る）
    pub failure_reset_after:    Duration,
}

impl ContactFormConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint:               endpoint.into(),
            request_timeout:        Duration::from_secs(15),
            retry_on_connect_error: true,
            success_reset_after:    Duration::from_secs(3),
            failure_reset_after:    Duration::from_secs(6),
        }
    }

    /// 環境変数から読み込む
    ///
    /// | 変数名 | デフォルト |
    /// |--------|------------|
    /// | `CONTACT_API_URL` | `http://localhost:3000/api/contact` |
    /// | `CONTACT_REQUEST_TIMEOUT_SECS` | `15` |
    ///
    /// # Errors
    ///
    /// タイムアウトが正の整数でない場合。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            get("CONTACT_API_URL")
                .unwrap_or_else(|| "http://localhost:3000/api/contact".to_string()),
        );

        if let Some(raw) = get("CONTACT_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| e.to_string())
                .and_then(|secs| {
                    if secs == 0 {
                        Err("0 は指定できません".to_string())
                    } else {
                        Ok(secs)
                    }
                })
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "CONTACT_REQUEST_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason,
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_自動リセット間隔のデフォルトは成功3秒と失敗6秒() {
        let config = ContactFormConfig::new("http://localhost/api/contact");

        assert_eq!(config.success_reset_after, Duration::from_secs(3));
        assert_eq!(config.failure_reset_after, Duration::from_secs(6));
        assert!(config.retry_on_connect_error);
    }

    fn load(vars: &[(&str, &str)]) -> Result<ContactFormConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ContactFormConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_未設定ならデフォルト値を使う() {
        let config = load(&[]).unwrap();

        assert_eq!(config.endpoint, "http://localhost:3000/api/contact");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_タイムアウトを環境変数で上書きできる() {
        let config = load(&[
            ("CONTACT_API_URL", "https://example.com/api/contact"),
            ("CONTACT_REQUEST_TIMEOUT_SECS", " 30 "),
        ])
        .unwrap();

        assert_eq!(config.endpoint, "https://example.com/api/contact");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[rstest]
    #[case("soon")]
    #[case("-1")]
    #[case("0")]
    fn test_不正なタイムアウトはエラー(#[case] value: &str) {
        let err = load(&[("CONTACT_REQUEST_TIMEOUT_SECS", value)]).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "CONTACT_REQUEST_TIMEOUT_SECS",
                ..
            }
        ));
        assert!(err.to_string().contains("CONTACT_REQUEST_TIMEOUT_SECS"));
    }
}
