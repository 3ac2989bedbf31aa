//! 앱 사용 스냅샷 모델.
//!
//! 앱 실행 시점의 기기/환경 컨텍스트 한 건을 표현한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 밝기 값을 읽지 못했을 때의 기록값 (유효 범위 0~255와 구분됨)
pub const BRIGHTNESS_UNAVAILABLE: i32 = -1;

/// 앱 실행 시점의 컨텍스트 스냅샷
///
/// 생성 후 변경되지 않는다. 저장소에서의 변경은 행 삭제뿐이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUsage {
    /// 저장소가 부여하는 키 (None이면 삽입 시 자동 부여)
    pub id: Option<i64>,
    /// 수집 시각의 로컬 시(0~23)
    pub hour_of_day: u8,
    /// 실행된 앱 식별자
    pub package_name: String,
    /// 오디오 액세서리(유선/USB/블루투스 헤드셋 등) 연결 여부
    pub is_headset_connected: bool,
    /// 충전 중 여부 (완충 상태는 false)
    pub is_charging: bool,
    /// Wi-Fi 연결 여부
    pub is_wifi_connected: bool,
    /// 모바일 데이터 연결 여부
    pub is_mobile_data_connected: bool,
    /// 블루투스 어댑터 활성 + 페어링 기기 존재 여부 (실제 연결을 뜻하지 않음)
    pub is_bluetooth_connected: bool,
    /// 시스템 밝기 원시값 (읽기 실패 시 [`BRIGHTNESS_UNAVAILABLE`])
    pub brightness: i32,
    /// 수집 시각
    pub recorded_at: DateTime<Utc>,
}

impl AppUsage {
    /// 키를 제외한 모든 필드가 같은지 비교
    pub fn same_context(&self, other: &Self) -> bool {
        Self {
            id: other.id,
            ..self.clone()
        } == *other
    }

    /// 저장소가 부여한 키를 붙인 사본
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    /// 밝기 값이 유효하게 읽혔는지 여부
    pub fn has_brightness(&self) -> bool {
        self.brightness != BRIGHTNESS_UNAVAILABLE
    }

    /// 진단 로그용 한 줄 요약 (모든 필드를 쉼표로 나열)
    pub fn trace_line(&self) -> String {
        let id = self.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            id,
            self.hour_of_day,
            self.package_name,
            self.is_headset_connected,
            self.is_charging,
            self.is_wifi_connected,
            self.is_mobile_data_connected,
            self.is_bluetooth_connected,
            self.brightness,
            self.recorded_at.to_rfc3339(),
        )
    }
}
