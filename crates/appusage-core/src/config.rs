//! 애플리케이션 설정 구조체.
//!
//! 저장소 위치와 플랫폼 신호 소스 경로를 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드/저장.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 저장소 식별자 (DB 파일 이름)
pub const DATABASE_NAME: &str = "app_usage_database";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 로컬 저장소 설정
    pub storage: StorageConfig,
    /// 플랫폼 신호 소스 설정
    #[serde(default)]
    pub signals: SignalConfig,
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// DB 파일을 둘 디렉토리 (None이면 인메모리 DB)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// DB 파일 이름
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

impl StorageConfig {
    /// 지정 디렉토리의 파일 기반 저장소 설정
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            database_name: default_database_name(),
        }
    }

    /// 인메모리 저장소 설정 (테스트용)
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            database_name: default_database_name(),
        }
    }

    /// DB 파일 전체 경로 (인메모리면 None)
    pub fn database_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(&self.database_name))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// 플랫폼 신호 소스 설정
///
/// Linux 어댑터가 읽는 커널/BlueZ 경로. 테스트에서는 임시 디렉토리로 바꿔 끼운다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// sysfs 루트
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    /// procfs 루트
    #[serde(default = "default_procfs_root")]
    pub procfs_root: PathBuf,
    /// BlueZ 페어링 정보 디렉토리
    #[serde(default = "default_bluez_state_dir")]
    pub bluez_state_dir: PathBuf,
    /// 입력 장치 노드 디렉토리 (잭 삽입 스위치)
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            procfs_root: default_procfs_root(),
            bluez_state_dir: default_bluez_state_dir(),
            input_dir: default_input_dir(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            signals: SignalConfig::default(),
        }
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_database_name() -> String {
    DATABASE_NAME.to_string()
}
fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/sys")
}
fn default_procfs_root() -> PathBuf {
    PathBuf::from("/proc")
}
fn default_bluez_state_dir() -> PathBuf {
    PathBuf::from("/var/lib/bluetooth")
}
fn default_input_dir() -> PathBuf {
    PathBuf::from("/dev/input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_has_no_path() {
        let config = StorageConfig::in_memory();
        assert!(config.database_path().is_none());
        assert_eq!(config.database_name, "app_usage_database");
    }

    #[test]
    fn file_storage_path_joins_name() {
        let config = StorageConfig::at("/tmp/appusage");
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/tmp/appusage/app_usage_database"))
        );
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"storage":{}}"#).unwrap();
        assert_eq!(config, AppConfig::default_config());
        assert_eq!(config.signals.sysfs_root, PathBuf::from("/sys"));
        assert_eq!(config.signals.input_dir, PathBuf::from("/dev/input"));
    }
}
