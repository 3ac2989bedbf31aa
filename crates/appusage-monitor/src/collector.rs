//! 앱 사용 컨텍스트 수집.
//!
//! 신호 포트들을 조합해 앱 실행 시점의 [`AppUsage`] 스냅샷을 만든다.
//! 수집은 실패하지 않는다. 읽지 못한 신호는 기본값(false, 밝기는
//! [`BRIGHTNESS_UNAVAILABLE`])으로 대체된다.

use appusage_core::error::CoreError;
use appusage_core::models::device::{BatteryStatus, NetworkTransport};
use appusage_core::models::usage::{AppUsage, BRIGHTNESS_UNAVAILABLE};
use appusage_core::ports::signals::{
    AudioDeviceSource, BatterySource, BluetoothSource, BrightnessSource, Clock, NetworkSource,
};
use chrono::{Timelike, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// 수집기가 읽는 신호 소스 묶음
#[derive(Clone)]
pub struct DeviceSignals {
    pub clock: Arc<dyn Clock>,
    pub audio: Arc<dyn AudioDeviceSource>,
    pub battery: Arc<dyn BatterySource>,
    pub network: Arc<dyn NetworkSource>,
    pub bluetooth: Arc<dyn BluetoothSource>,
    pub brightness: Arc<dyn BrightnessSource>,
}

impl DeviceSignals {
    /// 신호 포트 5종을 모두 구현한 소스 하나로 묶음 생성
    pub fn from_source<S>(source: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: AudioDeviceSource
            + BatterySource
            + NetworkSource
            + BluetoothSource
            + BrightnessSource
            + 'static,
    {
        Self {
            clock,
            audio: source.clone(),
            battery: source.clone(),
            network: source.clone(),
            bluetooth: source.clone(),
            brightness: source,
        }
    }
}

/// 앱 사용 데이터 수집기
pub struct UsageDataCollector {
    signals: DeviceSignals,
}

impl UsageDataCollector {
    /// 새 수집기 생성
    pub fn new(signals: DeviceSignals) -> Self {
        Self { signals }
    }

    /// 현재 기기 상태로 스냅샷 생성
    ///
    /// 키는 비워 두며(`id = None`) 저장소가 삽입 시 부여한다.
    pub fn collect(&self, package_name: &str) -> AppUsage {
        let now = self.signals.clock.now();
        let transports = degrade("network", self.signals.network.active_transports());

        let usage = AppUsage {
            id: None,
            hour_of_day: now.hour() as u8,
            package_name: package_name.to_string(),
            is_headset_connected: self.headset_connected(),
            is_charging: self.charging(),
            is_wifi_connected: transports.contains(&NetworkTransport::Wifi),
            is_mobile_data_connected: transports.contains(&NetworkTransport::Cellular),
            is_bluetooth_connected: self.bluetooth_connected(),
            brightness: self.brightness(),
            recorded_at: now.with_timezone(&Utc),
        };

        debug!("usage:{}", usage.trace_line());
        usage
    }

    fn headset_connected(&self) -> bool {
        degrade("audio", self.signals.audio.attached_devices())
            .into_iter()
            .any(|device| device.is_accessory())
    }

    fn charging(&self) -> bool {
        degrade("battery", self.signals.battery.battery_status()) == Some(BatteryStatus::Charging)
    }

    /// 어댑터가 켜져 있고 페어링 기기가 하나 이상이면 true (실제 연결 여부는 아님)
    fn bluetooth_connected(&self) -> bool {
        degrade("bluetooth", self.signals.bluetooth.adapter_state())
            .is_some_and(|state| state.enabled && state.bonded_devices > 0)
    }

    fn brightness(&self) -> i32 {
        match self.signals.brightness.brightness() {
            Ok(value) => value,
            Err(e) => {
                log_degraded("brightness", &e);
                BRIGHTNESS_UNAVAILABLE
            }
        }
    }
}

/// 신호 읽기 실패를 기본값으로 대체
fn degrade<T: Default>(signal: &'static str, result: Result<T, CoreError>) -> T {
    result.unwrap_or_else(|e| {
        log_degraded(signal, &e);
        T::default()
    })
}

fn log_degraded(signal: &'static str, err: &CoreError) {
    match err {
        CoreError::SignalUnavailable { .. } => debug!("{err} → {signal} 기본값 사용"),
        other => warn!("{signal} 신호 수집 중 예상치 못한 에러: {other} → 기본값 사용"),
    }
}
