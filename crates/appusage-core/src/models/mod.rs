//! APPUSAGE 도메인 모델.
//!
//! 수집기와 저장소가 공유하는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod device;
pub mod usage;
