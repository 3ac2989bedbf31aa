//! 저장소 핸들 공급자.
//!
//! 진입점이 하나 만들어 호출자에게 넘겨 주는 명시적 객체.
//! 첫 `get_instance` 호출에서만 DB를 열고, 이후 모든 호출은 같은 핸들을 공유한다.

use appusage_core::config::StorageConfig;
use appusage_core::error::CoreError;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

use crate::sqlite::SqliteUsageStore;

/// 저장소 핸들 공급자: 설정당 핸들 1개
pub struct StoreProvider {
    config: StorageConfig,
    instance: OnceCell<Arc<SqliteUsageStore>>,
}

impl StoreProvider {
    /// 새 공급자 생성 (DB는 아직 열지 않음)
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            instance: OnceCell::new(),
        }
    }

    /// 공유 저장소 핸들 반환
    ///
    /// 동시에 여러 스레드가 호출해도 DB는 한 번만 열린다.
    /// 열기에 실패하면 셀은 비어 있는 채로 남아 다음 호출에서 다시 시도한다.
    pub fn get_instance(&self) -> Result<Arc<SqliteUsageStore>, CoreError> {
        self.instance
            .get_or_try_init(|| {
                info!(
                    "저장소 핸들 생성: {}",
                    self.config
                        .database_path()
                        .map_or_else(|| "(인메모리)".to_string(), |p| p.display().to_string())
                );
                SqliteUsageStore::open_with(&self.config).map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// 핸들이 이미 만들어졌는지 여부
    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appusage_core::ports::storage::UsageStore;

    #[test]
    fn lazily_opens_once() {
        let provider = StoreProvider::new(StorageConfig::in_memory());
        assert!(!provider.is_initialized());

        let first = provider.get_instance().unwrap();
        assert!(provider.is_initialized());
        let second = provider.get_instance().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_callers_share_one_handle() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = StoreProvider::new(StorageConfig::at(dir.path()));

        let handles: Vec<Arc<SqliteUsageStore>> = std::thread::scope(|scope| {
            let joins: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| provider.get_instance().unwrap()))
                .collect();
            joins.into_iter().map(|j| j.join().unwrap()).collect()
        });

        assert_eq!(handles.len(), 16);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[test]
    fn writes_are_visible_through_every_handle() {
        let provider = StoreProvider::new(StorageConfig::in_memory());
        let writer = provider.get_instance().unwrap();
        writer
            .insert(&appusage_core::models::usage::AppUsage {
                id: None,
                hour_of_day: 11,
                package_name: "com.example.shared".to_string(),
                is_headset_connected: false,
                is_charging: false,
                is_wifi_connected: true,
                is_mobile_data_connected: false,
                is_bluetooth_connected: false,
                brightness: 90,
                recorded_at: chrono::Utc::now(),
            })
            .unwrap();

        // 인메모리 DB라도 같은 연결이므로 보임
        let reader = provider.get_instance().unwrap();
        assert_eq!(reader.get_all().unwrap().len(), 1);
    }

    #[test]
    fn failed_open_can_retry() {
        let dir = tempfile::TempDir::new().unwrap();
        // 디렉토리 자리에 파일이 있으면 열기 실패
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"file").unwrap();

        let provider = StoreProvider::new(StorageConfig::at(&blocker));
        assert!(matches!(
            provider.get_instance(),
            Err(CoreError::Storage(_))
        ));
        assert!(!provider.is_initialized());

        std::fs::remove_file(&blocker).unwrap();
        assert!(provider.get_instance().is_ok());
        assert!(provider.is_initialized());
    }
}
