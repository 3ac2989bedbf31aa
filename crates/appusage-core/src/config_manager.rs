//! 설정 파일 관리.
//!
//! 플랫폼별 설정 디렉토리의 `config.json`을 읽고, 없으면 기본값으로 만든다.
//! 명령줄 프로세스 하나가 소유하며 잠금은 없다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 파일과 그 내용
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: AppConfig,
}

impl ConfigManager {
    /// 플랫폼 기본 위치의 설정 열기
    pub fn open_default() -> Result<Self, CoreError> {
        Self::open(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 지정 경로의 설정 열기
    ///
    /// 파일이 없으면 상위 디렉토리까지 만들고 기본 설정을 기록한다.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let config = if path.exists() {
            read_config(&path)?
        } else {
            let config = AppConfig::default_config();
            write_config(&path, &config)?;
            info!("기본 설정 파일 생성: {}", path.display());
            config
        };

        Ok(Self { path, config })
    }

    /// 현재 설정
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 설정 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 설정을 고친 뒤 파일에 기록
    ///
    /// 기록에 실패하면 메모리의 설정도 바뀌지 않는다.
    pub fn edit<F>(&mut self, change: F) -> Result<&AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut next = self.config.clone();
        change(&mut next);
        write_config(&self.path, &next)?;
        self.config = next;
        debug!("설정 저장: {}", self.path.display());
        Ok(&self.config)
    }

    /// 플랫폼별 설정 디렉토리 (`~/.config/appusage/` 등)
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        Ok(project_dirs()?.config_dir().to_path_buf())
    }

    /// 플랫폼별 데이터 디렉토리 (DB 파일 기본 위치)
    pub fn data_dir() -> Result<PathBuf, CoreError> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }
}

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from("com", "appusage", "appusage")
        .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display())))?;

    serde_json::from_str(&content)
        .map_err(|e| CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display())))
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", parent.display()))
        })?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)
        .map_err(|e| CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(manager.path(), path.as_path());
        assert_eq!(manager.config(), &AppConfig::default_config());
    }

    #[test]
    fn edit_persists_across_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut manager = ConfigManager::open(&path).unwrap();
        let edited = manager
            .edit(|c| {
                c.storage.data_dir = Some(PathBuf::from("/data/usage"));
                c.signals.sysfs_root = PathBuf::from("/tmp/sys");
            })
            .unwrap()
            .clone();

        let reopened = ConfigManager::open(&path).unwrap();
        assert_eq!(reopened.config(), &edited);
        assert_eq!(
            reopened.config().storage.data_dir,
            Some(PathBuf::from("/data/usage"))
        );
    }

    #[test]
    fn failed_edit_keeps_previous_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let mut manager = ConfigManager::open(&path).unwrap();

        // 파일 자리에 디렉토리가 생기면 기록 실패
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let result = manager.edit(|c| c.storage.database_name = "other".to_string());
        assert!(matches!(result, Err(CoreError::Config(_))));
        assert_eq!(manager.config(), &AppConfig::default_config());
    }

    #[test]
    fn broken_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ConfigManager::open(&path),
            Err(CoreError::Config(_))
        ));
    }
}
