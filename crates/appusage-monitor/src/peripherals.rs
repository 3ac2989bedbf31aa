//! 오디오 주변기기 탐지 보조 포트.
//!
//! `/proc/asound/cards`는 사운드 카드만 보여 주므로 두 가지를 따로 읽는다.
//! - 내장 코덱 잭 삽입 상태: ALSA가 잭마다 만드는 입력 장치의 `SW_*_INSERT` 스위치
//! - 연결된 블루투스 오디오 기기: BlueZ D-Bus `org.bluez.Device1.Connected`
//!
//! 두 포트 모두 `SysfsSignals`가 소유하며 테스트에서는 가짜 구현으로 바꿔 끼운다.

use appusage_core::error::CoreError;
use appusage_core::models::device::AudioDeviceType;
use std::path::Path;
use std::sync::Arc;

/// 잭 삽입 스위치 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JackSwitch {
    Headphone,
    Microphone,
    LineOut,
    LineIn,
}

/// 잭 삽입 상태 포트
pub trait JackSource: Send + Sync {
    /// 현재 삽입 상태인 잭 스위치 목록
    fn inserted_jacks(&self) -> Result<Vec<JackSwitch>, CoreError>;
}

/// 블루투스 링크 상태 포트
pub trait LinkSource: Send + Sync {
    /// `adapter`(`hci0` 등)에 지금 연결된 기기 주소만 골라 반환
    fn connected(&self, adapter: &str, devices: &[String]) -> Result<Vec<String>, CoreError>;
}

/// 삽입된 잭 스위치를 오디오 장치 유형으로 변환
///
/// 마이크 스위치가 함께 켜지면 헤드셋(4극), 헤드폰 스위치만 켜지면 헤드폰.
pub fn jack_devices(jacks: &[JackSwitch]) -> Vec<AudioDeviceType> {
    let inserted = |switch| jacks.contains(&switch);
    let mut devices = Vec::new();

    if inserted(JackSwitch::Microphone) {
        devices.push(AudioDeviceType::WiredHeadset);
    } else if inserted(JackSwitch::Headphone) {
        devices.push(AudioDeviceType::WiredHeadphones);
    }
    if inserted(JackSwitch::LineOut) {
        devices.push(AudioDeviceType::LineAnalog);
    }
    if inserted(JackSwitch::LineIn) {
        devices.push(AudioDeviceType::AuxLine);
    }
    devices
}

// 블루투스 SIG 16비트 서비스 UUID
const UUID_AUDIO_SINK: &str = "0000110b";
const UUID_HEADSET: &str = "00001108";
const UUID_HANDSFREE: &str = "0000111e";
const UUID_LE_AUDIO_STREAM: &str = "0000184e";
const UUID_LE_BROADCAST_SCAN: &str = "0000184f";

/// BlueZ 기기 `info` 파일에서 오디오 기기 유형 판별
///
/// `[General]` 섹션의 `Services=` UUID 목록을 먼저 보고,
/// 서비스 정보가 없으면 `Class=` 장치 클래스(Audio/Video 주요 클래스)로 판단한다.
pub fn bluetooth_audio_type(info: &str) -> Option<AudioDeviceType> {
    let services: Vec<String> = info_value(info, "Services")
        .map(|raw| {
            raw.split(';')
                .filter(|uuid| !uuid.is_empty())
                .map(|uuid| uuid.to_ascii_lowercase())
                .collect()
        })
        .unwrap_or_default();
    let offers = |short: &str| services.iter().any(|uuid| uuid.starts_with(short));

    if offers(UUID_AUDIO_SINK) {
        return Some(AudioDeviceType::BluetoothA2dp);
    }
    if offers(UUID_LE_AUDIO_STREAM) {
        return Some(AudioDeviceType::BleHeadset);
    }
    if offers(UUID_LE_BROADCAST_SCAN) {
        return Some(AudioDeviceType::BleBroadcast);
    }
    if offers(UUID_HEADSET) || offers(UUID_HANDSFREE) {
        return Some(AudioDeviceType::BluetoothSco);
    }
    if !services.is_empty() {
        return None;
    }

    let class = info_value(info, "Class")
        .and_then(|raw| u32::from_str_radix(raw.trim_start_matches("0x"), 16).ok())?;
    let major = (class >> 8) & 0x1f;
    let minor = (class >> 2) & 0x3f;
    match (major, minor) {
        // 헤드셋, 헤드폰, 스피커, 휴대용 오디오, 카 오디오, 하이파이
        (0x04, 0x01 | 0x05 | 0x06 | 0x07 | 0x08 | 0x0a) => Some(AudioDeviceType::BluetoothA2dp),
        (0x04, 0x02) => Some(AudioDeviceType::BluetoothSco),
        _ => None,
    }
}

fn info_value<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    info.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
}

/// 현재 플랫폼의 잭/링크 포트
pub fn system_peripherals(input_dir: &Path) -> (Arc<dyn JackSource>, Arc<dyn LinkSource>) {
    #[cfg(target_os = "linux")]
    {
        (
            Arc::new(linux::EvdevJacks::new(input_dir)),
            Arc::new(linux::BluezLinks),
        )
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = input_dir;
        (Arc::new(Unavailable), Arc::new(Unavailable))
    }
}

/// 잭/링크 정보를 얻을 수 없는 환경
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl JackSource for Unavailable {
    fn inserted_jacks(&self) -> Result<Vec<JackSwitch>, CoreError> {
        Err(CoreError::signal("audio", "잭 상태를 읽을 수 없는 플랫폼"))
    }
}

impl LinkSource for Unavailable {
    fn connected(&self, _adapter: &str, _devices: &[String]) -> Result<Vec<String>, CoreError> {
        Err(CoreError::signal("audio", "블루투스 링크 상태를 읽을 수 없는 플랫폼"))
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use super::{JackSource, JackSwitch, LinkSource};
    use appusage_core::error::CoreError;
    use evdev::{Device, SwitchType};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing::debug;

    const JACK_SWITCHES: [(SwitchType, JackSwitch); 4] = [
        (SwitchType::SW_HEADPHONE_INSERT, JackSwitch::Headphone),
        (SwitchType::SW_MICROPHONE_INSERT, JackSwitch::Microphone),
        (SwitchType::SW_LINEOUT_INSERT, JackSwitch::LineOut),
        (SwitchType::SW_LINEIN_INSERT, JackSwitch::LineIn),
    ];

    /// `/dev/input/event*` 잭 스위치 조회
    pub struct EvdevJacks {
        input_dir: PathBuf,
    }

    impl EvdevJacks {
        pub fn new(input_dir: &Path) -> Self {
            Self {
                input_dir: input_dir.to_path_buf(),
            }
        }
    }

    impl JackSource for EvdevJacks {
        fn inserted_jacks(&self) -> Result<Vec<JackSwitch>, CoreError> {
            let entries = fs::read_dir(&self.input_dir).map_err(|e| {
                CoreError::signal(
                    "audio",
                    format!("{} 읽기 실패: {e}", self.input_dir.display()),
                )
            })?;

            let mut nodes = 0usize;
            let mut opened = 0usize;
            let mut jacks = Vec::new();
            for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
                let is_event_node = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("event"));
                if !is_event_node {
                    continue;
                }
                nodes += 1;

                let device = match Device::open(&path) {
                    Ok(device) => device,
                    Err(e) => {
                        debug!("입력 장치 열기 실패: {}: {e}", path.display());
                        continue;
                    }
                };
                opened += 1;

                if device.supported_switches().is_none() {
                    continue;
                }
                let state = match device.get_switch_state() {
                    Ok(state) => state,
                    Err(e) => {
                        debug!("스위치 상태 조회 실패: {}: {e}", path.display());
                        continue;
                    }
                };
                for (code, jack) in JACK_SWITCHES {
                    if state.contains(code) && !jacks.contains(&jack) {
                        jacks.push(jack);
                    }
                }
            }

            // 노드는 있는데 하나도 못 열었다면 권한 문제: 잭 없음과 구분
            if nodes > 0 && opened == 0 {
                return Err(CoreError::signal(
                    "audio",
                    format!("입력 장치 {nodes}개 모두 열 수 없음 (권한 확인)"),
                ));
            }
            Ok(jacks)
        }
    }

    /// BlueZ 시스템 버스 조회
    pub struct BluezLinks;

    impl LinkSource for BluezLinks {
        fn connected(&self, adapter: &str, devices: &[String]) -> Result<Vec<String>, CoreError> {
            let conn = zbus::blocking::Connection::system()
                .map_err(|e| CoreError::signal("audio", format!("시스템 버스 연결 실패: {e}")))?;

            let mut connected = Vec::new();
            for addr in devices {
                let path = format!("/org/bluez/{adapter}/dev_{}", addr.replace(':', "_"));
                let proxy = match zbus::blocking::Proxy::new(
                    &conn,
                    "org.bluez",
                    path.as_str(),
                    "org.bluez.Device1",
                ) {
                    Ok(proxy) => proxy,
                    Err(e) => {
                        debug!("BlueZ 프록시 생성 실패: {path}: {e}");
                        continue;
                    }
                };

                match proxy.get_property::<bool>("Connected") {
                    Ok(true) => connected.push(addr.clone()),
                    Ok(false) => {}
                    Err(e) => debug!("연결 상태 조회 실패: {path}: {e}"),
                }
            }
            Ok(connected)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headphones_only() {
        assert_eq!(
            jack_devices(&[JackSwitch::Headphone]),
            vec![AudioDeviceType::WiredHeadphones]
        );
    }

    #[test]
    fn headphone_and_mic_is_headset() {
        assert_eq!(
            jack_devices(&[JackSwitch::Headphone, JackSwitch::Microphone]),
            vec![AudioDeviceType::WiredHeadset]
        );
    }

    #[test]
    fn line_jacks() {
        assert_eq!(
            jack_devices(&[JackSwitch::LineOut, JackSwitch::LineIn]),
            vec![AudioDeviceType::LineAnalog, AudioDeviceType::AuxLine]
        );
        assert!(jack_devices(&[]).is_empty());
    }

    #[test]
    fn a2dp_sink_from_services() {
        let info = "[General]\n\
                    Name=WH-1000XM4\n\
                    Class=0x240404\n\
                    Services=00001108-0000-1000-8000-00805f9b34fb;0000110B-0000-1000-8000-00805f9b34fb;0000111e-0000-1000-8000-00805f9b34fb;\n\
                    Trusted=true\n";
        assert_eq!(
            bluetooth_audio_type(info),
            Some(AudioDeviceType::BluetoothA2dp)
        );
    }

    #[test]
    fn hands_free_only_is_sco() {
        let info = "[General]\nServices=0000111e-0000-1000-8000-00805f9b34fb;\n";
        assert_eq!(
            bluetooth_audio_type(info),
            Some(AudioDeviceType::BluetoothSco)
        );
    }

    #[test]
    fn le_audio_headset() {
        let info = "[General]\nServices=0000184e-0000-1000-8000-00805f9b34fb;00001850-0000-1000-8000-00805f9b34fb;\n";
        assert_eq!(bluetooth_audio_type(info), Some(AudioDeviceType::BleHeadset));
    }

    #[test]
    fn non_audio_device_is_ignored() {
        // HID 마우스: 서비스 정보가 있으면 클래스는 보지 않음
        let mouse = "[General]\nClass=0x002580\nServices=00001124-0000-1000-8000-00805f9b34fb;\n";
        assert_eq!(bluetooth_audio_type(mouse), None);
        assert_eq!(bluetooth_audio_type("[General]\nName=Phone\n"), None);
    }

    #[test]
    fn class_fallback_without_services() {
        // Audio/Video 주요 클래스, 헤드폰 보조 클래스
        assert_eq!(
            bluetooth_audio_type("[General]\nClass=0x240418\n"),
            Some(AudioDeviceType::BluetoothA2dp)
        );
        // 휴대폰 주요 클래스
        assert_eq!(bluetooth_audio_type("[General]\nClass=0x5a020c\n"), None);
    }

    #[test]
    fn unavailable_sources_report_signal_errors() {
        assert!(matches!(
            Unavailable.inserted_jacks(),
            Err(CoreError::SignalUnavailable { signal: "audio", .. })
        ));
        assert!(Unavailable
            .connected("hci0", &["AC:80:0A:12:34:56".to_string()])
            .is_err());
    }
}
