//! 로컬 저장소 포트.
//!
//! 구현: `appusage-storage` crate (rusqlite)

use crate::error::CoreError;
use crate::models::usage::AppUsage;

/// 앱 사용 스냅샷 저장소 (추가 전용 로그)
pub trait UsageStore: Send + Sync {
    /// 저장된 모든 행 조회 (`id` 오름차순)
    fn get_all(&self) -> Result<Vec<AppUsage>, CoreError>;

    /// 한 행 추가 후 부여된 키 반환
    ///
    /// `usage.id`가 None이면 저장소가 새 키를 부여한다.
    /// 명시한 키는 1 이상이어야 하며, 0이나 음수는 자동 부여 요청으로 해석하지 않고 거부한다.
    fn insert(&self, usage: &AppUsage) -> Result<i64, CoreError>;

    /// 모든 필드(키 포함)가 일치하는 행 삭제
    ///
    /// 일치하는 행이 없으면 아무것도 하지 않고 `Ok(false)`.
    fn delete(&self, usage: &AppUsage) -> Result<bool, CoreError>;
}
