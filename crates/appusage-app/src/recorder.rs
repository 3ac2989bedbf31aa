//! 수집 → 저장 흐름.
//!
//! 앱 실행 한 건마다 스냅샷을 만들고 저장소에 추가한다.

use anyhow::{Context, Result};
use appusage_core::models::usage::AppUsage;
use appusage_core::ports::storage::UsageStore;
use appusage_monitor::collector::UsageDataCollector;
use std::sync::Arc;
use tracing::info;

/// 앱 실행 기록기
pub struct UsageRecorder {
    collector: UsageDataCollector,
    store: Arc<dyn UsageStore>,
}

impl UsageRecorder {
    pub fn new(collector: UsageDataCollector, store: Arc<dyn UsageStore>) -> Self {
        Self { collector, store }
    }

    /// 스냅샷 수집 후 저장, 키가 붙은 레코드 반환
    pub fn record_launch(&self, package_name: &str) -> Result<AppUsage> {
        let usage = self.collector.collect(package_name);
        let id = self
            .store
            .insert(&usage)
            .with_context(|| format!("{package_name} 실행 기록 저장 실패"))?;

        info!("앱 실행 기록: {} (id={})", package_name, id);
        Ok(usage.with_id(id))
    }

    /// 저장하지 않고 수집만
    pub fn preview(&self, package_name: &str) -> AppUsage {
        self.collector.collect(package_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appusage_core::error::CoreError;
    use appusage_monitor::clock::SystemClock;
    use appusage_monitor::collector::DeviceSignals;
    use appusage_monitor::platform::UnsupportedPlatform;
    use appusage_storage::sqlite::SqliteUsageStore;

    fn collector() -> UsageDataCollector {
        UsageDataCollector::new(DeviceSignals::from_source(
            Arc::new(UnsupportedPlatform),
            Arc::new(SystemClock),
        ))
    }

    struct RejectingStore;

    impl UsageStore for RejectingStore {
        fn get_all(&self) -> Result<Vec<AppUsage>, CoreError> {
            Err(CoreError::Storage("읽기 거부".to_string()))
        }

        fn insert(&self, _usage: &AppUsage) -> Result<i64, CoreError> {
            Err(CoreError::Storage("쓰기 거부".to_string()))
        }

        fn delete(&self, _usage: &AppUsage) -> Result<bool, CoreError> {
            Err(CoreError::Storage("삭제 거부".to_string()))
        }
    }

    #[test]
    fn record_launch_persists_snapshot() {
        let store = Arc::new(SqliteUsageStore::open_in_memory().unwrap());
        let recorder = UsageRecorder::new(collector(), store.clone());

        let recorded = recorder.record_launch("com.example.app").unwrap();
        assert!(recorded.id.is_some());

        let rows = store.get_all().unwrap();
        assert_eq!(rows, vec![recorded]);
    }

    #[test]
    fn storage_failure_surfaces() {
        let recorder = UsageRecorder::new(collector(), Arc::new(RejectingStore));
        let err = recorder.record_launch("com.example.app").unwrap_err();

        assert!(err.to_string().contains("com.example.app"));
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::Storage(_))
        ));
    }

    #[test]
    fn preview_does_not_write() {
        let store = Arc::new(SqliteUsageStore::open_in_memory().unwrap());
        let recorder = UsageRecorder::new(collector(), store.clone());

        let usage = recorder.preview("com.example.app");
        assert!(usage.id.is_none());
        assert_eq!(store.count().unwrap(), 0);
    }
}
