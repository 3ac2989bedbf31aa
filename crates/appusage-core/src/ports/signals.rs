//! 기기 신호 포트.
//!
//! 구현: `appusage-monitor` crate (Linux sysfs/procfs, 미지원 플랫폼 대체 구현)
//!
//! 각 포트는 신호 하나만 읽는다. 읽기 실패는 `CoreError::SignalUnavailable`로
//! 돌려주고, 기본값 대체는 수집기가 맡는다.

use chrono::{DateTime, FixedOffset};

use crate::error::CoreError;
use crate::models::device::{
    AudioDeviceType, BatteryStatus, BluetoothAdapterState, NetworkTransport,
};

/// 현재 로컬 시각
pub trait Clock: Send + Sync {
    /// 로컬 오프셋이 붙은 현재 시각
    fn now(&self) -> DateTime<FixedOffset>;
}

/// 연결된 입출력 오디오 장치 열거
pub trait AudioDeviceSource: Send + Sync {
    fn attached_devices(&self) -> Result<Vec<AudioDeviceType>, CoreError>;
}

/// 최근 배터리 상태
pub trait BatterySource: Send + Sync {
    /// 배터리 상태 (보고된 상태가 없으면 None)
    fn battery_status(&self) -> Result<Option<BatteryStatus>, CoreError>;
}

/// 활성 네트워크의 전송 계층 집합
pub trait NetworkSource: Send + Sync {
    /// 활성 네트워크가 없으면 빈 Vec
    fn active_transports(&self) -> Result<Vec<NetworkTransport>, CoreError>;
}

/// 블루투스 어댑터 상태
pub trait BluetoothSource: Send + Sync {
    /// 어댑터가 없으면 None
    fn adapter_state(&self) -> Result<Option<BluetoothAdapterState>, CoreError>;
}

/// 시스템 화면 밝기 설정
pub trait BrightnessSource: Send + Sync {
    fn brightness(&self) -> Result<i32, CoreError>;
}
