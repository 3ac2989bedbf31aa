//! # appusage-storage
//!
//! 로컬 저장소 어댑터.
//! SQLite 기반 앱 사용 스냅샷 저장, 스키마 버전 관리,
//! 프로세스당 하나의 저장소 핸들 공유를 담당한다.
//!
//! ## 모듈
//! - `sqlite`: 스냅샷 저장소 (UsageStore 구현)
//! - `migration`: 스키마 마이그레이션
//! - `provider`: 저장소 핸들 1회 생성/공유

pub mod migration;
pub mod provider;
pub mod sqlite;
