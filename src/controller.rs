//! リクエストのライフサイクル管理
//!
//! 状態遷移:
//! - Idle → Submitting（送信開始）
//! - Submitting → Succeeded / Failed（レスポンス到着時にどちらか一方）
//! - Succeeded / Failed → Submitting（再送信。前回の結果・エラーは破棄）
//! - Submitting → Failed（完了前に `submit` のfutureが破棄された場合）
//!
//! 結果とエラーは状態の中に保持するため、
//! 「成功結果とエラーが同時に存在する」状態は表現できない。

use crate::analyzer::AnalysisService;
use crate::error::{AnalyzerError, Result};
use analyzer_common::{normalize, AnalysisInput, NormalizedResult, RawResponse};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl std::fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestPhase::Idle => write!(f, "idle"),
            RequestPhase::Submitting => write!(f, "submitting"),
            RequestPhase::Succeeded => write!(f, "succeeded"),
            RequestPhase::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug)]
enum State {
    Idle,
    Submitting,
    Succeeded {
        raw: RawResponse,
        result: NormalizedResult,
    },
    Failed {
        message: String,
    },
}

impl State {
    fn phase(&self) -> RequestPhase {
        match self {
            State::Idle => RequestPhase::Idle,
            State::Submitting => RequestPhase::Submitting,
            State::Succeeded { .. } => RequestPhase::Succeeded,
            State::Failed { .. } => RequestPhase::Failed,
        }
    }
}

/// `submit` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// リクエストが終端状態に到達した
    Completed(RequestPhase),
    /// 送信中だったため何もしなかった
    Ignored,
}

/// 描画側に渡す現在の状態
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub phase: RequestPhase,
    pub result: Option<NormalizedResult>,
    pub error_message: Option<String>,
}

pub struct RequestController<S> {
    service: S,
    state: Mutex<State>,
}

impl<S: AnalysisService> RequestController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(State::Idle),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn phase(&self) -> RequestPhase {
        self.lock().phase()
    }

    pub fn result(&self) -> Option<NormalizedResult> {
        match &*self.lock() {
            State::Succeeded { result, .. } => Some(result.clone()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match &*self.lock() {
            State::Failed { message } => Some(message.clone()),
            _ => None,
        }
    }

    /// 成功時に保持している生レスポンス
    pub fn raw_response(&self) -> Option<RawResponse> {
        match &*self.lock() {
            State::Succeeded { raw, .. } => Some(raw.clone()),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.lock();
        let (result, error_message) = match &*state {
            State::Succeeded { result, .. } => (Some(result.clone()), None),
            State::Failed { message } => (None, Some(message.clone())),
            _ => (None, None),
        };

        ControllerSnapshot {
            phase: state.phase(),
            result,
            error_message,
        }
    }

    /// 入力を送信し、終端状態まで待つ
    ///
    /// - 送信中の呼び出しは `Ok(SubmitOutcome::Ignored)`（キューもキャンセルもしない）
    /// - テキストも添付もない場合は `Err(AnalyzerError::Validation)`、状態は変わらない
    /// - 通信・デコードのエラーは `Err` ではなく `Failed` 状態として返る
    /// - 完了前にfutureを破棄すると `Failed`（キャンセル）になり、再送信できる
    pub async fn submit(&self, input: &AnalysisInput) -> Result<SubmitOutcome> {
        if !self.begin(input)? {
            return Ok(SubmitOutcome::Ignored);
        }

        let guard = InFlight::new(&self.state);
        let outcome = self.service.analyze(input).await;
        guard.disarm();
        Ok(SubmitOutcome::Completed(self.finish(outcome)))
    }

    fn begin(&self, input: &AnalysisInput) -> Result<bool> {
        let mut state = self.lock();

        if matches!(*state, State::Submitting) {
            debug!("送信中のため submit を無視");
            return Ok(false);
        }

        if !input.is_submittable() {
            warn!(phase = %state.phase(), "テキストも画像もないため送信を拒否");
            return Err(AnalyzerError::Validation(
                "テキストまたは画像ファイルを指定してください".into(),
            ));
        }

        *state = State::Submitting;
        info!(
            text_len = input.text.len(),
            has_file = input.attachment.is_some(),
            "解析を開始"
        );
        Ok(true)
    }

    fn finish(&self, outcome: Result<RawResponse>) -> RequestPhase {
        let next = match outcome {
            Ok(raw) => {
                let result = normalize(&raw);
                State::Succeeded { raw, result }
            }
            Err(e) => State::Failed {
                message: e.to_string(),
            },
        };

        let mut state = self.lock();
        *state = next;
        let phase = state.phase();
        match &*state {
            State::Failed { message } => warn!(error = %message, "解析に失敗"),
            _ => info!(%phase, "解析完了"),
        }
        phase
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 送信中の `submit` が完了前に破棄された場合、Submitting のまま残さず Failed にする
struct InFlight<'a> {
    state: &'a Mutex<State>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<State>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = lock_state(self.state);
        if matches!(*state, State::Submitting) {
            let message = AnalyzerError::Cancelled.to_string();
            warn!(error = %message, "送信中の submit が破棄された");
            *state = State::Failed { message };
        }
    }
}
