//! # テスト用モックリレー
//!
//! ハンドラ・ユースケースのテストで使用するインメモリのメールリレー。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! contact-relay-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contact_relay_domain::mail::{OutboundMessage, RelayError, RelayReceipt};

use crate::relay::MailRelay;

/// モックリレーの振る舞い
#[derive(Debug, Clone)]
enum Behavior {
    Succeed(RelayReceipt),
    FailVerify(RelayError),
    FailSend(RelayError),
    /// 呼ばれた時点でテストを失敗させる
    Forbidden,
}

/// 呼び出しを記録するモックリレー
#[derive(Clone)]
pub struct MockMailRelay {
    behavior:     Behavior,
    verify_calls: Arc<Mutex<usize>>,
    sent:         Arc<Mutex<Vec<OutboundMessage>>>,
}

impl MockMailRelay {
    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            verify_calls: Arc::new(Mutex::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 接続確認・送信ともに成功する
    pub fn succeeding() -> Self {
        Self::with(Behavior::Succeed(RelayReceipt::default()))
    }

    /// 成功し、指定の応答テキストを返す
    pub fn acknowledging(acknowledgment: &str) -> Self {
        Self::with(Behavior::Succeed(RelayReceipt {
            acknowledgment: Some(acknowledgment.to_string()),
        }))
    }

    /// 接続確認で失敗する
    pub fn failing_verify(detail: &str) -> Self {
        Self::with(Behavior::FailVerify(RelayError::Verification(
            detail.to_string(),
        )))
    }

    /// 接続確認は成功し、送信で失敗する
    pub fn failing_send(detail: &str) -> Self {
        Self::with(Behavior::FailSend(RelayError::SendFailed(detail.to_string())))
    }

    /// 一度でも呼ばれたら panic する
    pub fn forbidden() -> Self {
        Self::with(Behavior::Forbidden)
    }

    pub fn verify_calls(&self) -> usize {
        *self.verify_calls.lock().unwrap()
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailRelay for MockMailRelay {
    async fn verify(&self) -> Result<(), RelayError> {
        *self.verify_calls.lock().unwrap() += 1;
        match &self.behavior {
            Behavior::Forbidden => panic!("リレーが呼ばれてはならない（verify）"),
            Behavior::FailVerify(err) => Err(err.clone()),
            Behavior::Succeed(_) | Behavior::FailSend(_) => Ok(()),
        }
    }

    async fn send(&self, message: &OutboundMessage) -> Result<RelayReceipt, RelayError> {
        match &self.behavior {
            Behavior::Forbidden => panic!("リレーが呼ばれてはならない（send）"),
            Behavior::FailVerify(_) => panic!("接続確認に失敗したリレーで send が呼ばれた"),
            Behavior::FailSend(err) => Err(err.clone()),
            Behavior::Succeed(receipt) => {
                self.sent.lock().unwrap().push(message.clone());
                Ok(receipt.clone())
            }
        }
    }
}
