//! # appusage-app
//!
//! APPUSAGE 명령줄 진입점.
//! 설정 로드, 어댑터 와이어링(DI), 수집 → 저장 흐름 실행.

mod recorder;

use anyhow::{anyhow, Context, Result};
use appusage_core::config::AppConfig;
use appusage_core::config_manager::ConfigManager;
use appusage_core::models::usage::AppUsage;
use appusage_core::ports::storage::UsageStore;
use appusage_monitor::collector::UsageDataCollector;
use appusage_monitor::platform::platform_signals;
use appusage_storage::provider::StoreProvider;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::recorder::UsageRecorder;

/// 앱 실행 시점의 기기 컨텍스트를 기록한다
#[derive(Parser, Debug)]
#[command(name = "appusage")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 데이터 저장 디렉토리 (설정 파일 값보다 우선)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 앱 실행 한 건을 수집해 저장
    Record {
        /// 실행된 앱 식별자
        package: String,
        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },
    /// 저장하지 않고 현재 컨텍스트만 출력
    Collect {
        package: String,
        #[arg(long)]
        json: bool,
    },
    /// 저장된 모든 기록 출력
    List {
        #[arg(long)]
        json: bool,
    },
    /// 키로 기록 한 건 삭제
    Delete {
        id: i64,
    },
    /// 설정 파일 조회/변경
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// 설정 파일 경로와 내용 출력
    Show,
    /// DB 파일을 둘 디렉토리를 설정 파일에 기록
    SetDataDir { dir: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = log_filter(&args.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let mut manager = open_config(args.config.as_deref())?;

    let command = match args.command {
        Command::Config { action } => return run_config(&mut manager, action),
        command => command,
    };

    let config = resolve_config(manager.config(), args.data_dir)?;
    debug!("설정: {:?}", config);

    // ── 어댑터 생성 (DI 와이어링) ──
    let provider = StoreProvider::new(config.storage.clone());
    let store = provider
        .get_instance()
        .context("저장소를 열 수 없습니다")?;
    let collector = UsageDataCollector::new(platform_signals(&config.signals));
    let recorder = UsageRecorder::new(collector, store.clone());

    match command {
        Command::Record { package, json } => {
            let usage = recorder.record_launch(&package)?;
            print_usage(&usage, json)?;
        }
        Command::Collect { package, json } => {
            print_usage(&recorder.preview(&package), json)?;
        }
        Command::List { json } => {
            let rows = store.get_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_table(&rows);
            }
        }
        Command::Delete { id } => {
            let usage = store
                .get_by_id(id)?
                .ok_or_else(|| anyhow!("id={id} 기록이 없습니다"))?;
            if store.delete(&usage)? {
                info!("기록 삭제: id={}", id);
                println!("삭제됨: id={id}");
            } else {
                println!("삭제할 기록 없음: id={id}");
            }
        }
        // 위에서 처리
        Command::Config { .. } => {}
    }

    Ok(())
}

/// 워크스페이스 crate별 로그 필터 (바이너리 crate 이름은 `appusage`)
fn log_filter(level: &str) -> String {
    ["appusage", "appusage_core", "appusage_monitor", "appusage_storage"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn open_config(path: Option<&Path>) -> Result<ConfigManager> {
    match path {
        Some(path) => ConfigManager::open(path),
        None => ConfigManager::open_default(),
    }
    .context("설정 로드 실패")
}

/// 설정 파일 값에 CLI 인자 적용
///
/// 데이터 디렉토리 우선순위: `--data-dir` > 설정 파일 > 플랫폼 데이터 디렉토리
fn resolve_config(file_config: &AppConfig, data_dir: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = file_config.clone();
    if let Some(dir) = data_dir {
        config.storage.data_dir = Some(dir);
    }
    if config.storage.data_dir.is_none() {
        config.storage.data_dir = Some(ConfigManager::data_dir()?);
    }

    Ok(config)
}

fn run_config(manager: &mut ConfigManager, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", manager.path().display());
            println!("{}", serde_json::to_string_pretty(manager.config())?);
        }
        ConfigAction::SetDataDir { dir } => {
            manager
                .edit(|c| c.storage.data_dir = Some(dir.clone()))
                .context("설정 저장 실패")?;
            info!("데이터 디렉토리 변경: {}", dir.display());
            println!("데이터 디렉토리: {}", dir.display());
        }
    }
    Ok(())
}

fn print_usage(usage: &AppUsage, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(usage)?);
    } else {
        print_table(std::slice::from_ref(usage));
    }
    Ok(())
}

fn print_table(rows: &[AppUsage]) {
    if rows.is_empty() {
        println!("기록 없음");
        return;
    }

    println!(
        "{:>6}  {:>4}  {:<32}  {:^7}  {:^6}  {:^4}  {:^6}  {:^4}  {:>5}  {}",
        "ID", "시", "패키지", "헤드셋", "충전", "WiFi", "모바일", "BT", "밝기", "기록 시각"
    );
    for row in rows {
        println!(
            "{:>6}  {:>4}  {:<32}  {:^7}  {:^6}  {:^4}  {:^6}  {:^4}  {:>5}  {}",
            row.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            row.hour_of_day,
            row.package_name,
            flag(row.is_headset_connected),
            flag(row.is_charging),
            flag(row.is_wifi_connected),
            flag(row.is_mobile_data_connected),
            flag(row.is_bluetooth_connected),
            brightness_cell(row),
            row.recorded_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S"),
        );
    }
}

/// 밝기를 읽지 못한 행은 센티널 대신 `-`
fn brightness_cell(row: &AppUsage) -> String {
    if row.has_brightness() {
        row.brightness.to_string()
    } else {
        "-".to_string()
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "✓"
    } else {
        "·"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appusage_core::models::usage::BRIGHTNESS_UNAVAILABLE;

    #[test]
    fn parse_record_command() {
        let args = Args::try_parse_from(["appusage", "record", "com.example.app", "--json"]).unwrap();
        match args.command {
            Command::Record { package, json } => {
                assert_eq!(package, "com.example.app");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["appusage", "list", "--data-dir", "/tmp/usage", "-l", "debug"])
                .unwrap();
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/usage")));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn cli_data_dir_overrides_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let args = Args::try_parse_from([
            "appusage",
            "--config",
            config_path.to_str().unwrap(),
            "--data-dir",
            "/tmp/override",
            "list",
        ])
        .unwrap();

        let manager = open_config(args.config.as_deref()).unwrap();
        assert!(config_path.exists());

        let config = resolve_config(manager.config(), args.data_dir).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/override")));
    }

    #[test]
    fn config_set_data_dir_is_used_by_later_runs() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let args = Args::try_parse_from([
            "appusage",
            "-c",
            config_path.to_str().unwrap(),
            "config",
            "set-data-dir",
            "/srv/usage",
        ])
        .unwrap();

        let mut manager = open_config(args.config.as_deref()).unwrap();
        match args.command {
            Command::Config { action } => run_config(&mut manager, action).unwrap(),
            other => panic!("unexpected command: {other:?}"),
        }

        // 다음 실행은 파일에 기록된 디렉토리를 사용
        let reopened = open_config(Some(&config_path)).unwrap();
        let config = resolve_config(reopened.config(), None).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/usage")));
    }

    #[test]
    fn config_show_parses() {
        let args = Args::try_parse_from(["appusage", "config", "show"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn log_filter_targets_binary_crate_name() {
        let filter = log_filter("debug");
        assert!(filter.split(',').any(|t| t == "appusage=debug"));
        assert!(filter.contains("appusage_storage=debug"));
        assert!(!filter.contains("appusage_app"));
        assert!(EnvFilter::try_new(&filter).is_ok());
    }

    #[test]
    fn unreadable_brightness_shown_as_dash() {
        let mut usage = AppUsage {
            id: Some(3),
            hour_of_day: 8,
            package_name: "com.example.app".to_string(),
            is_headset_connected: false,
            is_charging: false,
            is_wifi_connected: true,
            is_mobile_data_connected: false,
            is_bluetooth_connected: false,
            brightness: BRIGHTNESS_UNAVAILABLE,
            recorded_at: chrono::Utc::now(),
        };
        assert_eq!(brightness_cell(&usage), "-");

        usage.brightness = 0;
        assert_eq!(brightness_cell(&usage), "0");
    }

    #[test]
    fn delete_requires_id() {
        assert!(Args::try_parse_from(["appusage", "delete"]).is_err());
        assert!(Args::try_parse_from(["appusage", "delete", "abc"]).is_err());
    }
}
