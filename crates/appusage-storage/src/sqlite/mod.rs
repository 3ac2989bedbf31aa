//! SQLite 저장소 어댑터.
//!
//! `UsageStore` 포트 구현.
//!
//! # 모듈 구조
//! - `usage`: 앱 사용 스냅샷 저장/조회/삭제

mod usage;

use appusage_core::config::StorageConfig;
use appusage_core::error::CoreError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::migration;

/// SQLite 저장소: `UsageStore` 포트 구현
///
/// 연결 하나를 `Mutex`로 감싸 동시 쓰기를 직렬화한다.
pub struct SqliteUsageStore {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteUsageStore {
    /// 설정에 따라 파일 또는 인메모리 저장소 생성
    pub fn open_with(config: &StorageConfig) -> Result<Self, CoreError> {
        match config.database_path() {
            Some(path) => Self::open(&path),
            None => Self::open_in_memory(),
        }
    }

    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Storage(format!("데이터 디렉토리 생성 실패: {}: {e}", parent.display()))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 현재 DB의 스키마 버전
    pub fn schema_version(&self) -> Result<u32, CoreError> {
        let conn = self.lock()?;
        migration::get_version(&conn)
            .map_err(|e| CoreError::Storage(format!("스키마 버전 조회 실패: {e}")))
    }

    pub(super) fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Storage(format!("잠금 획득 실패: {e}")))
    }
}
