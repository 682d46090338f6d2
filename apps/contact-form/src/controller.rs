//! # フォームコントローラ
//!
//! 入力値と送信状態を保持し、送信の結果を [`SubmissionOutcome`] として公開する。
//!
//! ## 状態遷移
//!
//! ```text
//! Idle ──submit──▶ Pending ──▶ Success ──(3 秒)──▶ Idle
//!                          └─▶ Failure ──(6 秒)──▶ Idle
//! ```
//!
//! - 成功時は入力値を空に戻し、失敗時は再送できるよう保持する
//! - 自動リセットは 1 つだけ予約される。新しい送信を始めると予約中のリセットは取り消される
//! - 画面は [`FormController::subscribe`] で状態の変化を購読する

use std::{sync::Arc, time::Duration};

use contact_relay_domain::contact::{FormField, SubmissionPayload};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    client::{ClientError, ContactApiClient},
    config::ContactFormConfig,
};

/// 1 回の送信の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 初期状態（またはリセット後）
    #[default]
    Idle,
    /// 送信中
    Pending,
    /// リレーが受領した
    Success,
    /// 検証エラーまたは通信エラー（画面に表示する文言）
    Failure(String),
}

impl SubmissionOutcome {
    /// 送信中か
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure(_))
    }
}

/// フォームコントローラ
///
/// `tokio` ランタイム上で使う（自動リセットのタイマーをタスクとして起動するため）。
pub struct FormController {
    client:              Arc<dyn ContactApiClient>,
    payload:             SubmissionPayload,
    outcome:             Arc<watch::Sender<SubmissionOutcome>>,
    pending_reset:       Option<JoinHandle<()>>,
    success_reset_after: Duration,
    failure_reset_after: Duration,
}

impl FormController {
    pub fn new(client: Arc<dyn ContactApiClient>, config: &ContactFormConfig) -> Self {
        let (outcome, _) = watch::channel(SubmissionOutcome::Idle);
        Self {
            client,
            payload: SubmissionPayload::default(),
            outcome: Arc::new(outcome),
            pending_reset: None,
            success_reset_after: config.success_reset_after,
            failure_reset_after: config.failure_reset_after,
        }
    }

    /// 現在の入力値
    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    /// 項目を更新する（入力のたびに呼ばれる、後勝ち）
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.payload.set_field(field, value);
    }

    /// 現在の送信状態
    pub fn outcome(&self) -> SubmissionOutcome {
        self.outcome.borrow().clone()
    }

    /// 送信状態の変化を購読する
    pub fn subscribe(&self) -> watch::Receiver<SubmissionOutcome> {
        self.outcome.subscribe()
    }

    /// 送信中か（送信ボタンの無効化に使う）
    pub fn is_submitting(&self) -> bool {
        self.outcome.borrow().is_pending()
    }

    /// 現在の入力値を送信する
    ///
    /// 1 回の呼び出しで送るリクエストは 1 つ（接続失敗時の再送はクライアント側の設定による）。
    /// 終了状態（`Success` または `Failure`）を返す。
    pub async fn submit(&mut self) -> SubmissionOutcome {
        self.cancel_pending_reset();

        if let Err(err) = self.payload.validate() {
            return self.finish(SubmissionOutcome::Failure(err.to_string()));
        }

        self.outcome.send_replace(SubmissionOutcome::Pending);
        let snapshot = self.payload.clone();

        let outcome = match self.client.submit(&snapshot).await {
            Ok(response) => {
                tracing::debug!(message = %response.message, "お問い合わせの送信に成功");
                self.payload.clear();
                SubmissionOutcome::Success
            }
            Err(err) => {
                tracing::warn!(error = %err, "お問い合わせの送信に失敗");
                SubmissionOutcome::Failure(failure_message(&err))
            }
        };

        self.finish(outcome)
    }

    fn finish(&mut self, outcome: SubmissionOutcome) -> SubmissionOutcome {
        let delay = match outcome {
            SubmissionOutcome::Success => self.success_reset_after,
            _ => self.failure_reset_after,
        };
        self.outcome.send_replace(outcome.clone());
        self.schedule_reset(delay);
        outcome
    }

    fn schedule_reset(&mut self, delay: Duration) {
        let outcome = Arc::clone(&self.outcome);
        self.pending_reset = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // 送信中の状態は上書きしない
            outcome.send_if_modified(|current| {
                if current.is_terminal() {
                    *current = SubmissionOutcome::Idle;
                    true
                } else {
                    false
                }
            });
        }));
    }

    fn cancel_pending_reset(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            handle.abort();
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.cancel_pending_reset();
    }
}

fn failure_message(err: &ClientError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        crate::client::GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::Mutex,
    };

    use async_trait::async_trait;
    use contact_relay_shared::MessageResponse;
    use pretty_assertions::assert_eq;
    use tokio::{sync::Notify, time::Instant};

    use super::*;

    /// 結果を順に返すスタブクライアント
    struct StubClient {
        results:  Mutex<VecDeque<Result<MessageResponse, ClientError>>>,
        received: Mutex<Vec<SubmissionPayload>>,
        /// 指定時は `notify_one` されるまで応答を保留する
        gate:     Option<Arc<Notify>>,
    }

    impl StubClient {
        fn returning(results: Vec<Result<MessageResponse, ClientError>>) -> Arc<Self> {
            Arc::new(Self {
                results:  Mutex::new(results.into()),
                received: Mutex::new(Vec::new()),
                gate:     None,
            })
        }

        fn gated(
            results: Vec<Result<MessageResponse, ClientError>>,
            gate: Arc<Notify>,
        ) -> Arc<Self> {
            Arc::new(Self {
                results:  Mutex::new(results.into()),
                received: Mutex::new(Vec::new()),
                gate:     Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContactApiClient for StubClient {
        async fn submit(
            &self,
            payload: &SubmissionPayload,
        ) -> Result<MessageResponse, ClientError> {
            self.received.lock().unwrap().push(payload.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("想定外の送信")
        }
    }

    fn ok() -> Result<MessageResponse, ClientError> {
        Ok(MessageResponse::email_sent(None))
    }

    fn controller(client: Arc<StubClient>) -> FormController {
        let mut controller =
            FormController::new(client, &ContactFormConfig::new("http://localhost/api/contact"));
        controller.update_field(FormField::Name, "Ada");
        controller.update_field(FormField::Email, "ada@example.com");
        controller.update_field(FormField::Subject, "Hello");
        controller.update_field(FormField::Message, "Hi there");
        controller
    }

    #[tokio::test(start_paused = true)]
    async fn test_成功すると入力値が空に戻る() {
        let client = StubClient::returning(vec![ok()]);
        let mut sut = controller(client.clone());

        let outcome = sut.submit().await;

        assert_eq!(outcome, SubmissionOutcome::Success);
        assert_eq!(sut.outcome(), SubmissionOutcome::Success);
        assert_eq!(sut.payload(), &SubmissionPayload::default());
        assert_eq!(client.calls(), 1);
        assert_eq!(
            client.received.lock().unwrap()[0],
            SubmissionPayload::new("Ada", "ada@example.com", "Hello", "Hi there")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_失敗しても入力値は保持される() {
        let client = StubClient::returning(vec![Err(ClientError::Rejected(
            "Email server rejected the message. Please try again later.".to_string(),
        ))]);
        let mut sut = controller(client);

        let outcome = sut.submit().await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Failure(
                "Email server rejected the message. Please try again later.".to_string()
            )
        );
        assert_eq!(sut.payload().name, "Ada");
        assert_eq!(sut.payload().message, "Hi there");
    }

    #[tokio::test(start_paused = true)]
    async fn test_未入力の項目があれば送信せずに失敗する() {
        let client = StubClient::returning(vec![]);
        let mut sut = controller(client.clone());
        sut.update_field(FormField::Email, "");

        let outcome = sut.submit().await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Failure("Missing required fields: email".to_string())
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_応答を待つ間はpendingが公開される() {
        // Given: 応答を保留するクライアント
        let gate = Arc::new(Notify::new());
        let client = StubClient::gated(vec![ok()], gate.clone());
        let mut sut = controller(client.clone());
        let mut rx = sut.subscribe();
        assert_eq!(*rx.borrow(), SubmissionOutcome::Idle);

        // When: 送信を開始し、リクエストが届くまで待つ
        let task = tokio::spawn(async move {
            let outcome = sut.submit().await;
            (sut, outcome)
        });
        rx.wait_for(SubmissionOutcome::is_pending).await.unwrap();

        // Then: 応答待ちの間は Pending
        assert!(rx.borrow().is_pending());
        assert_eq!(client.calls(), 1);

        // When: 応答を返す
        gate.notify_one();
        let (sut, outcome) = task.await.unwrap();

        // Then
        assert_eq!(outcome, SubmissionOutcome::Success);
        assert_eq!(*rx.borrow_and_update(), SubmissionOutcome::Success);
        assert!(!sut.is_submitting());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_成功表示は3秒後にidleに戻る() {
        let client = StubClient::returning(vec![ok()]);
        let mut sut = controller(client);
        let start = Instant::now();

        sut.submit().await;
        let mut rx = sut.subscribe();

        tokio::time::sleep(Duration::from_millis(2_999)).await;
        assert_eq!(sut.outcome(), SubmissionOutcome::Success);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SubmissionOutcome::Idle);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_失敗表示は6秒後にidleに戻る() {
        let client = StubClient::returning(vec![Err(ClientError::Timeout)]);
        let mut sut = controller(client);
        let start = Instant::now();

        sut.submit().await;
        let mut rx = sut.subscribe();

        tokio::time::sleep(Duration::from_millis(5_999)).await;
        assert!(matches!(sut.outcome(), SubmissionOutcome::Failure(_)));

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SubmissionOutcome::Idle);
        assert!(start.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_新しい送信は予約中のリセットを取り消す() {
        let client = StubClient::returning(vec![Err(ClientError::Timeout), ok()]);
        let mut sut = controller(client);

        // 失敗（6 秒後にリセット予約）
        sut.submit().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        // 5 秒後に再送して成功（3 秒後にリセット予約）
        sut.submit().await;

        // 最初の予約（送信開始から 6 秒）の時点ではまだ Success のまま
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(sut.outcome(), SubmissionOutcome::Success);

        // 2 回目の送信から 3 秒を過ぎれば Idle
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(sut.outcome(), SubmissionOutcome::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_サーバーのエラー文がない場合は汎用文言() {
        let client = StubClient::returning(vec![Err(ClientError::Network(String::new()))]);
        let mut sut = controller(client);

        let outcome = sut.submit().await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Failure(crate::client::GENERIC_FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_送信後はis_submittingがfalse() {
        let client = StubClient::returning(vec![ok()]);
        let mut sut = controller(client);

        sut.submit().await;

        assert!(!sut.is_submitting());
    }
}
