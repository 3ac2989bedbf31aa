//! Linux 커널 인터페이스 기반 신호 소스.
//!
//! sysfs/procfs 파일과 BlueZ 상태 디렉토리를 읽어 기기 신호를 만든다.
//!
//! ## 읽는 경로
//! - 배터리: `<sysfs>/class/power_supply/*/{type,status}`
//! - 네트워크: `<procfs>/net/{route,ipv6_route}`의 기본 경로 인터페이스,
//!   `<sysfs>/class/net/<iface>/{operstate,carrier,uevent,wireless,phy80211}`
//! - 블루투스: `<sysfs>/class/bluetooth/hci*`, `<sysfs>/class/rfkill/*/{type,soft,hard}`,
//!   `<bluez>/<어댑터 주소>/<기기 주소>/info`
//! - 밝기: `<sysfs>/class/backlight/*/brightness`
//! - 오디오: `<procfs>/asound/cards`, 잭 스위치와 블루투스 연결 상태는 [`crate::peripherals`]
//!
//! 루트 경로는 `SignalConfig`에서 받으므로 테스트에서 임시 디렉토리로 대체할 수 있다.

use appusage_core::config::SignalConfig;
use appusage_core::error::CoreError;
use appusage_core::models::device::{
    AudioDeviceType, BatteryStatus, BluetoothAdapterState, NetworkTransport,
};
use appusage_core::ports::signals::{
    AudioDeviceSource, BatterySource, BluetoothSource, BrightnessSource, NetworkSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::peripherals::{self, JackSource, LinkSource};

// rtentry 플래그 (linux/route.h)
const RTF_UP: u32 = 0x0001;
const RTF_REJECT: u32 = 0x0200;

/// sysfs/procfs 신호 소스: 신호 포트 5종 구현
#[derive(Clone)]
pub struct SysfsSignals {
    sysfs_root: PathBuf,
    procfs_root: PathBuf,
    bluez_state_dir: PathBuf,
    jacks: Arc<dyn JackSource>,
    links: Arc<dyn LinkSource>,
}

impl SysfsSignals {
    /// 설정된 루트 경로와 시스템 잭/링크 포트로 신호 소스 생성
    pub fn new(config: &SignalConfig) -> Self {
        let (jacks, links) = peripherals::system_peripherals(&config.input_dir);
        Self::with_peripherals(config, jacks, links)
    }

    /// 잭/링크 포트를 지정해 생성
    pub fn with_peripherals(
        config: &SignalConfig,
        jacks: Arc<dyn JackSource>,
        links: Arc<dyn LinkSource>,
    ) -> Self {
        Self {
            sysfs_root: config.sysfs_root.clone(),
            procfs_root: config.procfs_root.clone(),
            bluez_state_dir: config.bluez_state_dir.clone(),
            jacks,
            links,
        }
    }

    fn class_dir(&self, class: &str) -> PathBuf {
        self.sysfs_root.join("class").join(class)
    }
}

impl BatterySource for SysfsSignals {
    fn battery_status(&self) -> Result<Option<BatteryStatus>, CoreError> {
        let supplies = sorted_entries(&self.class_dir("power_supply"))
            .map_err(|e| CoreError::signal("battery", format!("power_supply 읽기 실패: {e}")))?;

        // AC 어댑터/USB 전원은 건너뛰고 첫 배터리만 사용
        let status = supplies
            .iter()
            .filter(|dir| read_trimmed(&dir.join("type")).as_deref() == Some("Battery"))
            .find_map(|dir| read_trimmed(&dir.join("status")))
            .map(|raw| BatteryStatus::parse(&raw));

        if status.is_none() {
            debug!("배터리 장치 없음");
        }
        Ok(status)
    }
}

impl NetworkSource for SysfsSignals {
    /// 기본 경로를 가진 인터페이스의 전송 계층
    ///
    /// 링크만 올라와 있고 기본 경로가 없는 인터페이스(대기 중인 모뎀, 보조 Wi-Fi 등)는 제외한다.
    fn active_transports(&self) -> Result<Vec<NetworkTransport>, CoreError> {
        let net = self.class_dir("net");

        let mut transports = Vec::new();
        for name in self.default_route_interfaces()? {
            let iface = net.join(&name);
            if !is_link_up(&iface) {
                debug!("기본 경로 인터페이스 {} 링크 다운", name);
                continue;
            }

            let transport = classify_interface(&iface, &name);
            debug!("활성 인터페이스: {} → {:?}", name, transport);
            if !transports.contains(&transport) {
                transports.push(transport);
            }
        }

        Ok(transports)
    }
}

impl SysfsSignals {
    /// IPv4/IPv6 기본 경로가 걸린 인터페이스 이름 (라우팅 테이블 순서)
    ///
    /// 두 테이블 모두 읽지 못할 때만 실패로 본다.
    fn default_route_interfaces(&self) -> Result<Vec<String>, CoreError> {
        let net = self.procfs_root.join("net");
        let v4 = fs::read_to_string(net.join("route"));
        let v6 = fs::read_to_string(net.join("ipv6_route"));
        if let (Err(e), Err(_)) = (&v4, &v6) {
            return Err(CoreError::signal(
                "network",
                format!("라우팅 테이블 읽기 실패: {}: {e}", net.display()),
            ));
        }

        let v4_routes = v4.as_deref().map(parse_ipv4_default_routes).unwrap_or_default();
        let v6_routes = v6.as_deref().map(parse_ipv6_default_routes).unwrap_or_default();

        let mut names: Vec<String> = Vec::new();
        for name in v4_routes.into_iter().chain(v6_routes) {
            if name != "lo" && !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }
}

/// `/proc/net/route`에서 기본 경로 인터페이스 추출
///
/// 헤더 다음 줄부터 `Iface Destination Gateway Flags RefCnt Use Metric Mask ...`
pub fn parse_ipv4_default_routes(content: &str) -> Vec<String> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [iface, destination, _gateway, flags, _refcnt, _use, _metric, mask, ..] =
                fields.as_slice()
            else {
                return None;
            };
            let flags = u32::from_str_radix(flags, 16).ok()?;
            let is_default = *destination == "00000000" && *mask == "00000000";
            (is_default && flags & RTF_UP != 0 && flags & RTF_REJECT == 0)
                .then(|| iface.to_string())
        })
        .collect()
}

/// `/proc/net/ipv6_route`에서 기본 경로(`::/0`) 인터페이스 추출
///
/// 헤더 없이 `dest plen src splen nexthop metric refcnt use flags iface`
pub fn parse_ipv6_default_routes(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [destination, prefix_len, _, _, _, _, _, _, flags, iface] = fields.as_slice()
            else {
                return None;
            };
            let flags = u32::from_str_radix(flags, 16).ok()?;
            let is_default = destination.bytes().all(|b| b == b'0') && *prefix_len == "00";
            (is_default && flags & RTF_UP != 0 && flags & RTF_REJECT == 0)
                .then(|| iface.to_string())
        })
        .collect()
}

impl BluetoothSource for SysfsSignals {
    fn adapter_state(&self) -> Result<Option<BluetoothAdapterState>, CoreError> {
        // 어댑터 디렉토리가 없으면 블루투스 스택 자체가 없는 것
        if self.bluetooth_adapters().is_empty() {
            return Ok(None);
        }

        let enabled = self.bluetooth_unblocked();
        if !enabled {
            return Ok(Some(BluetoothAdapterState {
                enabled,
                bonded_devices: 0,
            }));
        }

        let bonded_devices = self.bonded_devices()?.len();
        Ok(Some(BluetoothAdapterState {
            enabled,
            bonded_devices,
        }))
    }
}

impl SysfsSignals {
    /// 컨트롤러 이름 (`hci0` 등, 연결 항목 `hci0:256`은 제외)
    fn bluetooth_adapters(&self) -> Vec<String> {
        sorted_entries(&self.class_dir("bluetooth"))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .filter(|n| n.starts_with("hci") && !n.contains(':'))
            .collect()
    }

    /// rfkill 스위치 기준 블루투스 활성 여부
    ///
    /// 블루투스 rfkill 항목이 하나도 없으면 차단 수단이 없으므로 켜진 것으로 본다.
    fn bluetooth_unblocked(&self) -> bool {
        let switches: Vec<PathBuf> = sorted_entries(&self.class_dir("rfkill"))
            .unwrap_or_default()
            .into_iter()
            .filter(|p| read_trimmed(&p.join("type")).as_deref() == Some("bluetooth"))
            .collect();

        if switches.is_empty() {
            return true;
        }

        switches.iter().any(|p| {
            read_trimmed(&p.join("soft")).as_deref() == Some("0")
                && read_trimmed(&p.join("hard")).as_deref() == Some("0")
        })
    }

    /// BlueZ에 저장된 페어링 기기 디렉토리 (`<bluez>/<adapter>/<device>/info`)
    fn bonded_devices(&self) -> Result<Vec<PathBuf>, CoreError> {
        let adapters = sorted_entries(&self.bluez_state_dir).map_err(|e| {
            CoreError::signal(
                "bluetooth",
                format!(
                    "BlueZ 상태 디렉토리 읽기 실패: {}: {e}",
                    self.bluez_state_dir.display()
                ),
            )
        })?;

        Ok(adapters
            .iter()
            .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(is_bd_addr))
            .flat_map(|adapter| sorted_entries(adapter).unwrap_or_default())
            .filter(|device| {
                device
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(is_bd_addr)
                    && device.join("info").is_file()
            })
            .collect())
    }

    /// 지금 연결된 페어링 오디오 기기
    fn connected_bluetooth_audio(&self) -> Result<Vec<AudioDeviceType>, CoreError> {
        let adapters = self.bluetooth_adapters();
        if adapters.is_empty() || !self.bluetooth_unblocked() {
            return Ok(Vec::new());
        }

        let candidates: Vec<(String, AudioDeviceType)> = self
            .bonded_devices()?
            .iter()
            .filter_map(|device| {
                let addr = device.file_name()?.to_str()?.to_string();
                let info = fs::read_to_string(device.join("info")).ok()?;
                Some((addr, peripherals::bluetooth_audio_type(&info)?))
            })
            .collect();
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let addresses: Vec<String> = candidates.iter().map(|(addr, _)| addr.clone()).collect();
        let mut devices = Vec::new();
        for adapter in &adapters {
            let connected = self.links.connected(adapter, &addresses)?;
            devices.extend(
                candidates
                    .iter()
                    .filter(|(addr, _)| connected.contains(addr))
                    .map(|(_, kind)| *kind),
            );
        }
        Ok(devices)
    }
}

impl BrightnessSource for SysfsSignals {
    fn brightness(&self) -> Result<i32, CoreError> {
        let devices = sorted_entries(&self.class_dir("backlight"))
            .map_err(|e| CoreError::signal("brightness", format!("backlight 읽기 실패: {e}")))?;

        let device = devices
            .first()
            .ok_or_else(|| CoreError::signal("brightness", "backlight 장치 없음"))?;

        let raw = read_trimmed(&device.join("brightness")).ok_or_else(|| {
            CoreError::signal(
                "brightness",
                format!("{} 값 없음", device.join("brightness").display()),
            )
        })?;

        raw.parse::<i32>()
            .map_err(|e| CoreError::signal("brightness", format!("밝기 값 파싱 실패 '{raw}': {e}")))
    }
}

impl AudioDeviceSource for SysfsSignals {
    /// 사운드 카드, 잭 스위치, 블루투스 연결을 합친 오디오 장치 목록
    ///
    /// 일부 출처만 읽지 못하면 나머지로 답하고, 모두 실패할 때만 에러를 돌려준다.
    fn attached_devices(&self) -> Result<Vec<AudioDeviceType>, CoreError> {
        let sources = [
            self.sound_cards(),
            self.jacks
                .inserted_jacks()
                .map(|jacks| peripherals::jack_devices(&jacks)),
            self.connected_bluetooth_audio(),
        ];

        let total = sources.len();
        let mut devices = Vec::new();
        let mut failures = Vec::new();
        for source in sources {
            match source {
                Ok(found) => {
                    for device in found {
                        if !devices.contains(&device) {
                            devices.push(device);
                        }
                    }
                }
                Err(e) => failures.push(e.to_string()),
            }
        }

        if failures.len() == total {
            return Err(CoreError::signal("audio", failures.join("; ")));
        }
        for failure in &failures {
            debug!("오디오 출처 일부 읽기 실패: {}", failure);
        }
        Ok(devices)
    }
}

impl SysfsSignals {
    fn sound_cards(&self) -> Result<Vec<AudioDeviceType>, CoreError> {
        let cards_path = self.procfs_root.join("asound").join("cards");
        let content = fs::read_to_string(&cards_path).map_err(|e| {
            CoreError::signal(
                "audio",
                format!("{} 읽기 실패: {e}", cards_path.display()),
            )
        })?;

        Ok(parse_asound_cards(&content))
    }
}

/// `/proc/asound/cards` 파싱
///
/// 카드마다 두 줄이며 첫 줄만 사용한다:
/// ` 1 [Headset        ]: USB-Audio - Jabra EVOLVE 20`
///
/// 내장 코덱 카드에 꽂힌 3.5mm 기기는 여기서 드러나지 않으므로 잭 스위치로 따로 판단한다.
pub fn parse_asound_cards(content: &str) -> Vec<AudioDeviceType> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            if !line.starts_with(|c: char| c.is_ascii_digit()) {
                return None;
            }
            let (head, rest) = line.split_once("]: ")?;
            let card_id = head.split_once('[').map_or("", |(_, id)| id.trim());
            let (driver, name) = rest.split_once(" - ").unwrap_or((rest, ""));
            Some(classify_card(card_id, driver.trim(), name.trim()))
        })
        .collect()
}

fn classify_card(card_id: &str, driver: &str, name: &str) -> AudioDeviceType {
    let label = format!("{card_id} {name}").to_lowercase();

    if driver.eq_ignore_ascii_case("USB-Audio") {
        if label.contains("headset") || label.contains("headphone") {
            AudioDeviceType::UsbHeadset
        } else {
            AudioDeviceType::UsbDevice
        }
    } else if label.contains("hdmi") {
        AudioDeviceType::Hdmi
    } else {
        AudioDeviceType::BuiltinSpeaker
    }
}

/// 인터페이스 링크가 올라와 있는지 여부
///
/// 일부 모뎀/터널은 operstate가 `unknown`이므로 carrier 값으로 보완한다.
fn is_link_up(iface: &Path) -> bool {
    match read_trimmed(&iface.join("operstate")).as_deref() {
        Some("up") => true,
        Some("unknown") => read_trimmed(&iface.join("carrier")).as_deref() == Some("1"),
        _ => false,
    }
}

fn classify_interface(iface: &Path, name: &str) -> NetworkTransport {
    if iface.join("wireless").exists() || iface.join("phy80211").exists() {
        return NetworkTransport::Wifi;
    }

    let devtype = read_trimmed(&iface.join("uevent")).and_then(|uevent| {
        uevent
            .lines()
            .find_map(|l| l.strip_prefix("DEVTYPE=").map(str::to_string))
    });

    match devtype.as_deref() {
        Some("wlan") => NetworkTransport::Wifi,
        Some("wwan") => NetworkTransport::Cellular,
        Some("bluetooth") => NetworkTransport::Bluetooth,
        Some("wireguard") => NetworkTransport::Vpn,
        _ if name.starts_with("wwan") || name.starts_with("rmnet") => NetworkTransport::Cellular,
        _ if name.starts_with("tun") || name.starts_with("wg") || name.starts_with("tap") => {
            NetworkTransport::Vpn
        }
        _ => NetworkTransport::Ethernet,
    }
}

/// 블루투스 장치 주소 형식(`AA:BB:CC:DD:EE:FF`)인지 여부
fn is_bd_addr(name: &str) -> bool {
    name.len() == 17
        && name.split(':').count() == 6
        && name
            .split(':')
            .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// 디렉토리 항목을 이름순으로 반환
fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}
