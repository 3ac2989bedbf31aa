//! 앱 사용 스냅샷 스토리지 (UsageStore 포트 구현).
//!
//! 추가, 전체 조회, 전체 필드 일치 삭제.

use appusage_core::error::CoreError;
use appusage_core::models::usage::AppUsage;
use appusage_core::ports::storage::UsageStore;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use tracing::debug;

use super::SqliteUsageStore;

const SELECT_COLUMNS: &str = "SELECT id, hour_of_day, package_name, is_headset_connected, is_charging,
        is_wifi_connected, is_mobile_data_connected, is_bluetooth_connected, brightness, recorded_at
     FROM app_usage";

impl SqliteUsageStore {
    /// 저장된 행 수
    pub fn count(&self) -> Result<usize, CoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM app_usage", [], |row| row.get(0))
            .map_err(|e| CoreError::Storage(format!("행 수 조회 실패: {e}")))?;
        Ok(count as usize)
    }

    /// 키로 한 행 조회
    pub fn get_by_id(&self, id: i64) -> Result<Option<AppUsage>, CoreError> {
        let conn = self.lock()?;
        let result = conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            rusqlite::params![id],
            row_to_usage,
        );

        match result {
            Ok(usage) => Ok(Some(usage)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CoreError::Storage(format!("스냅샷 조회 실패: {e}"))),
        }
    }
}

impl UsageStore for SqliteUsageStore {
    fn get_all(&self) -> Result<Vec<AppUsage>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .map_err(|e| CoreError::Storage(format!("쿼리 준비 실패: {e}")))?;

        // 행 하나라도 읽지 못하면 빈 결과 대신 에러를 돌려준다
        let rows = stmt
            .query_map([], row_to_usage)
            .map_err(|e| CoreError::Storage(format!("쿼리 실행 실패: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Storage(format!("행 변환 실패: {e}")))?;

        Ok(rows)
    }

    fn insert(&self, usage: &AppUsage) -> Result<i64, CoreError> {
        if let Some(id) = usage.id.filter(|id| *id <= 0) {
            return Err(CoreError::Storage(format!(
                "명시 키는 1 이상이어야 합니다: id={id}"
            )));
        }

        let conn = self.lock()?;

        // id가 NULL이면 SQLite가 새 키를 부여
        conn.execute(
            "INSERT INTO app_usage (id, hour_of_day, package_name, is_headset_connected, is_charging,
                is_wifi_connected, is_mobile_data_connected, is_bluetooth_connected, brightness, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                usage.id,
                usage.hour_of_day,
                usage.package_name,
                usage.is_headset_connected,
                usage.is_charging,
                usage.is_wifi_connected,
                usage.is_mobile_data_connected,
                usage.is_bluetooth_connected,
                usage.brightness,
                usage.recorded_at.to_rfc3339(),
            ],
        )
        .map_err(|e| CoreError::Storage(format!("스냅샷 저장 실패: {e}")))?;

        let id = conn.last_insert_rowid();
        debug!("스냅샷 저장: id={}, package={}", id, usage.package_name);
        Ok(id)
    }

    fn delete(&self, usage: &AppUsage) -> Result<bool, CoreError> {
        let Some(id) = usage.id else {
            debug!("키 없는 스냅샷 삭제 요청, 무시");
            return Ok(false);
        };

        let conn = self.lock()?;
        let deleted = conn
            .execute(
                "DELETE FROM app_usage
                 WHERE id = ?1 AND hour_of_day = ?2 AND package_name = ?3
                   AND is_headset_connected = ?4 AND is_charging = ?5
                   AND is_wifi_connected = ?6 AND is_mobile_data_connected = ?7
                   AND is_bluetooth_connected = ?8 AND brightness = ?9 AND recorded_at = ?10",
                rusqlite::params![
                    id,
                    usage.hour_of_day,
                    usage.package_name,
                    usage.is_headset_connected,
                    usage.is_charging,
                    usage.is_wifi_connected,
                    usage.is_mobile_data_connected,
                    usage.is_bluetooth_connected,
                    usage.brightness,
                    usage.recorded_at.to_rfc3339(),
                ],
            )
            .map_err(|e| CoreError::Storage(format!("스냅샷 삭제 실패: {e}")))?;

        debug!("스냅샷 삭제: id={}, affected={}", id, deleted);
        Ok(deleted > 0)
    }
}

fn row_to_usage(row: &Row<'_>) -> rusqlite::Result<AppUsage> {
    let recorded_at: String = row.get(9)?;
    let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(AppUsage {
        id: Some(row.get(0)?),
        hour_of_day: row.get(1)?,
        package_name: row.get(2)?,
        is_headset_connected: row.get(3)?,
        is_charging: row.get(4)?,
        is_wifi_connected: row.get(5)?,
        is_mobile_data_connected: row.get(6)?,
        is_bluetooth_connected: row.get(7)?,
        brightness: row.get(8)?,
        recorded_at,
    })
}
