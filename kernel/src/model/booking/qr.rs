use crate::model::{
    booking::BookingPeriod,
    id::{BookingId, RoomId, UserId},
};
use base64::{engine::general_purpose, Engine as _};
use derive_new::new;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

/// Check-in payload embedded in the QR artifact presented at the counter.
#[derive(Debug, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub room_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl QrPayload {
    pub fn from_period(
        booking_id: BookingId,
        user_id: UserId,
        room_id: RoomId,
        room_name: String,
        period: &BookingPeriod,
    ) -> Self {
        Self {
            booking_id,
            user_id,
            room_id,
            room_name,
            date: period.start().format("%Y-%m-%d").to_string(),
            start_time: period.start().format("%H:%M").to_string(),
            end_time: period.end().format("%H:%M").to_string(),
        }
    }

    /// Encodes the payload as an opaque data URL, the form clients render
    /// into a scannable code.
    pub fn to_data_url(&self) -> AppResult<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok(format!(
            "data:application/json;base64,{}",
            general_purpose::STANDARD.encode(json)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn data_url_round_trips_the_payload() {
        let period = BookingPeriod::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        )
        .unwrap();
        let payload = QrPayload::from_period(
            BookingId::new(),
            UserId::new(),
            RoomId::new(),
            "Reading Room A".into(),
            &period,
        );

        let url = payload.to_data_url().unwrap();
        let encoded = url.strip_prefix("data:application/json;base64,").unwrap();
        let decoded: QrPayload =
            serde_json::from_slice(&general_purpose::STANDARD.decode(encoded).unwrap()).unwrap();

        assert_eq!(decoded.booking_id, payload.booking_id);
        assert_eq!(decoded.room_name, "Reading Room A");
        assert_eq!(decoded.date, "2024-01-01");
        assert_eq!(decoded.start_time, "10:00");
        assert_eq!(decoded.end_time, "12:00");
    }
}
