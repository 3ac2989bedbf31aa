//! APPUSAGE 핵심 에러 타입.
//!
//! 어댑터 crate(monitor, storage)는 모두 이 타입을 그대로 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 저장소 사용 불가 또는 쓰기 거부
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 플랫폼 신호를 읽을 수 없음 (수집기 내부에서 기본값으로 대체됨)
    #[error("{signal} 신호 읽기 실패: {reason}")]
    SignalUnavailable {
        /// 신호 이름 (예: "battery", "brightness")
        signal: &'static str,
        /// 실패 사유
        reason: String,
    },

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// `SignalUnavailable` 생성 헬퍼
    pub fn signal(signal: &'static str, reason: impl Into<String>) -> Self {
        Self::SignalUnavailable {
            signal,
            reason: reason.into(),
        }
    }
}
