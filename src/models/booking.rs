use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The latest scheduling guess. Each new parse overwrites it; only one
/// request is ever held.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingState {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
    pub confirmed: bool,
}

impl BookingState {
    pub fn is_confirmable(&self) -> bool {
        self.title.is_some() && self.date.is_some() && self.time.is_some()
    }

    pub fn clear(&mut self) {
        *self = BookingState::default();
    }
}
