//! # appusage-monitor
//!
//! 기기 신호 수집 어댑터.
//! 시각, 오디오 액세서리, 배터리, 네트워크, 블루투스, 화면 밝기를 읽어
//! 앱 실행 시점의 컨텍스트 스냅샷을 만든다.
//! 플랫폼 접근은 Linux sysfs/procfs 기반이며, 그 외 플랫폼은 기본값으로 대체된다.

pub mod clock;
pub mod collector;
pub mod peripherals;
pub mod platform;
pub mod sysfs;
