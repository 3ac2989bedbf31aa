//! # appusage-core
//!
//! APPUSAGE 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::usage::AppUsage;

    #[test]
    fn usage_serde_roundtrip() {
        let usage = AppUsage {
            id: Some(3),
            hour_of_day: 22,
            package_name: "org.example.reader".to_string(),
            is_headset_connected: false,
            is_charging: true,
            is_wifi_connected: false,
            is_mobile_data_connected: true,
            is_bluetooth_connected: false,
            brightness: 35,
            recorded_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&usage).unwrap();
        let deserialized: AppUsage = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, usage);
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.storage.database_name, "app_usage_database");
        assert_eq!(
            config.signals.bluez_state_dir,
            std::path::PathBuf::from("/var/lib/bluetooth")
        );
    }
}
