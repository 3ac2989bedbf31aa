//! 플랫폼별 신호 소스 선택.
//!
//! - Linux: [`SysfsSignals`](crate::sysfs::SysfsSignals)
//! - 기타 플랫폼: [`UnsupportedPlatform`] (모든 신호가 읽기 불가 → 수집기 기본값)

use appusage_core::config::SignalConfig;
use appusage_core::error::CoreError;
use appusage_core::models::device::{
    AudioDeviceType, BatteryStatus, BluetoothAdapterState, NetworkTransport,
};
use appusage_core::ports::signals::{
    AudioDeviceSource, BatterySource, BluetoothSource, BrightnessSource, NetworkSource,
};
use std::sync::Arc;

use crate::clock::SystemClock;
use crate::collector::DeviceSignals;

/// 현재 플랫폼의 신호 소스 묶음 생성
pub fn platform_signals(config: &SignalConfig) -> DeviceSignals {
    #[cfg(target_os = "linux")]
    {
        DeviceSignals::from_source(
            Arc::new(crate::sysfs::SysfsSignals::new(config)),
            Arc::new(SystemClock),
        )
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = config;
        tracing::debug!("신호 어댑터 미지원 플랫폼: 모든 신호 기본값 사용");
        DeviceSignals::from_source(Arc::new(UnsupportedPlatform), Arc::new(SystemClock))
    }
}

/// 신호 어댑터가 없는 플랫폼용 소스
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

fn unsupported(signal: &'static str) -> CoreError {
    CoreError::signal(signal, "이 플랫폼에서는 지원하지 않음")
}

impl AudioDeviceSource for UnsupportedPlatform {
    fn attached_devices(&self) -> Result<Vec<AudioDeviceType>, CoreError> {
        Err(unsupported("audio"))
    }
}

impl BatterySource for UnsupportedPlatform {
    fn battery_status(&self) -> Result<Option<BatteryStatus>, CoreError> {
        Err(unsupported("battery"))
    }
}

impl NetworkSource for UnsupportedPlatform {
    fn active_transports(&self) -> Result<Vec<NetworkTransport>, CoreError> {
        Err(unsupported("network"))
    }
}

impl BluetoothSource for UnsupportedPlatform {
    fn adapter_state(&self) -> Result<Option<BluetoothAdapterState>, CoreError> {
        Err(unsupported("bluetooth"))
    }
}

impl BrightnessSource for UnsupportedPlatform {
    fn brightness(&self) -> Result<i32, CoreError> {
        Err(unsupported("brightness"))
    }
}
