//! 기기 신호 모델.
//!
//! 플랫폼 신호 포트가 돌려주는 원시 상태값. 수집기가 이를 불리언 플래그로 환원한다.

use serde::{Deserialize, Serialize};

/// 오디오 장치 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioDeviceType {
    BuiltinEarpiece,
    BuiltinSpeaker,
    BuiltinMic,
    Telephony,
    Hdmi,
    WiredHeadphones,
    WiredHeadset,
    LineAnalog,
    LineDigital,
    UsbAccessory,
    UsbDevice,
    UsbHeadset,
    BluetoothSco,
    BluetoothA2dp,
    BleHeadset,
    BleSpeaker,
    BleBroadcast,
    AuxLine,
    Unknown,
}

impl AudioDeviceType {
    /// 헤드셋/액세서리로 인정되는 유형인지 여부
    pub fn is_accessory(self) -> bool {
        matches!(
            self,
            Self::WiredHeadphones
                | Self::WiredHeadset
                | Self::LineAnalog
                | Self::LineDigital
                | Self::UsbAccessory
                | Self::UsbDevice
                | Self::UsbHeadset
                | Self::BluetoothA2dp
                | Self::BleHeadset
                | Self::BleSpeaker
                | Self::BleBroadcast
                | Self::AuxLine
        )
    }
}

/// 배터리 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryStatus {
    Unknown,
    Charging,
    Discharging,
    NotCharging,
    Full,
}

impl BatteryStatus {
    /// 커널 power_supply `status` 문자열 파싱
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Charging" => Self::Charging,
            "Discharging" => Self::Discharging,
            "Not charging" => Self::NotCharging,
            "Full" => Self::Full,
            _ => Self::Unknown,
        }
    }
}

/// 네트워크 전송 계층
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkTransport {
    Wifi,
    Cellular,
    Ethernet,
    Bluetooth,
    Vpn,
}

/// 블루투스 어댑터 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BluetoothAdapterState {
    /// 어댑터 전원 켜짐 여부
    pub enabled: bool,
    /// 페어링(본딩)된 기기 수
    pub bonded_devices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessory_set() {
        assert!(AudioDeviceType::WiredHeadset.is_accessory());
        assert!(AudioDeviceType::BleBroadcast.is_accessory());
        assert!(AudioDeviceType::AuxLine.is_accessory());
        assert!(!AudioDeviceType::BuiltinSpeaker.is_accessory());
        assert!(!AudioDeviceType::BluetoothSco.is_accessory());
        assert!(!AudioDeviceType::Hdmi.is_accessory());
    }

    #[test]
    fn battery_status_parsing() {
        assert_eq!(BatteryStatus::parse("Charging\n"), BatteryStatus::Charging);
        assert_eq!(BatteryStatus::parse("Full"), BatteryStatus::Full);
        assert_eq!(
            BatteryStatus::parse("Not charging"),
            BatteryStatus::NotCharging
        );
        assert_eq!(BatteryStatus::parse("weird"), BatteryStatus::Unknown);
    }
}
