//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate가 이 trait들을 구현하며,
//! `appusage-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 수집과 저장은 모두 동기 호출이라 `async_trait`을 쓰지 않는다.

pub mod signals;
pub mod storage;
