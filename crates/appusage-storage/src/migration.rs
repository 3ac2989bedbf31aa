//! 스키마 마이그레이션.
//!
//! 버전 기반 SQLite 스키마 관리. 다음 버전이 생기면 `migrate_v2`를 추가하고
//! [`SCHEMA_VERSION`]을 올린다.

use rusqlite::Connection;
use tracing::{debug, info, warn};

/// 현재 스키마 버전
pub const SCHEMA_VERSION: u32 = 1;

/// 스키마 마이그레이션 실행
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current = get_version(conn)?;
    info!("현재 스키마 버전: {current}, 목표: {SCHEMA_VERSION}");

    if current > SCHEMA_VERSION {
        warn!("DB 스키마가 더 최신 버전({current})입니다: 마이그레이션 생략");
        return Ok(());
    }

    if current < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// 현재 스키마 버전 조회
pub fn get_version(conn: &Connection) -> Result<u32, rusqlite::Error> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
}

/// V1: app_usage 테이블 생성
fn migrate_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    debug!("마이그레이션 V1 실행: app_usage 테이블");

    conn.execute_batch(
        "
        -- 앱 실행 시점 컨텍스트 스냅샷 (추가 전용)
        CREATE TABLE IF NOT EXISTS app_usage (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            hour_of_day INTEGER NOT NULL CHECK (hour_of_day BETWEEN 0 AND 23),
            package_name TEXT NOT NULL,
            is_headset_connected INTEGER NOT NULL,
            is_charging INTEGER NOT NULL,
            is_wifi_connected INTEGER NOT NULL,
            is_mobile_data_connected INTEGER NOT NULL,
            is_bluetooth_connected INTEGER NOT NULL,
            brightness INTEGER NOT NULL,
            recorded_at TEXT NOT NULL
        );

        -- 버전 기록
        INSERT INTO schema_version (version) VALUES (1);
        ",
    )?;

    info!("마이그레이션 V1 완료");
    Ok(())
}
