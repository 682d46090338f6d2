//! リレーの接続先
//!
//! ホスト/ポートを直接指定する方式と、よく知られたプロバイダ名で指定する方式がある。
//! どちらも最終的に `(host, port, security)` に解決される。

use std::{fmt, str::FromStr};

/// トランスポートのセキュリティ方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransportSecurity {
    /// 平文で接続し STARTTLS で昇格する（必須、証明書検証あり）
    #[default]
    StartTls,
    /// 接続直後から TLS（SMTPS、証明書検証あり）
    Tls,
    /// 暗号化なし（ローカルの開発用 SMTP サーバー向け）
    None,
}

/// よく知られたメールプロバイダ
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WellKnownService {
    Gmail,
    Outlook,
    Hotmail,
    Office365,
    Yahoo,
}

impl WellKnownService {
    fn resolve(self) -> (&'static str, u16, TransportSecurity) {
        match self {
            Self::Gmail => ("smtp.gmail.com", 465, TransportSecurity::Tls),
            Self::Outlook | Self::Hotmail => {
                ("smtp-mail.outlook.com", 587, TransportSecurity::StartTls)
            }
            Self::Office365 => ("smtp.office365.com", 587, TransportSecurity::StartTls),
            Self::Yahoo => ("smtp.mail.yahoo.com", 465, TransportSecurity::Tls),
        }
    }
}

/// リレーの接続先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEndpoint {
    /// プロバイダ名による指定
    Service(WellKnownService),
    /// ホスト/ポートの直接指定
    Explicit {
        host:     String,
        port:     u16,
        security: TransportSecurity,
    },
}

impl RelayEndpoint {
    /// `(host, port, security)` に解決する
    pub fn resolve(&self) -> (&str, u16, TransportSecurity) {
        match self {
            Self::Service(service) => service.resolve(),
            Self::Explicit {
                host,
                port,
                security,
            } => (host.as_str(), *port, *security),
        }
    }

    /// プロバイダ名から接続先を作る
    ///
    /// # Errors
    ///
    /// 未知のプロバイダ名の場合は `strum::ParseError` を返す。
    pub fn from_service_name(name: &str) -> Result<Self, strum::ParseError> {
        WellKnownService::from_str(name.trim()).map(Self::Service)
    }
}

impl fmt::Display for RelayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (host, port, security) = self.resolve();
        write!(f, "{host}:{port} ({security})")
    }
}
