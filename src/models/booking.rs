use chrono::{NaiveDate, NaiveTime};

/// A consultation request from the booking form. Acknowledged, not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationRequest {
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: String,
}

impl ConsultationRequest {
    pub const CONFIRMATION: &'static str =
        "Appointment booked successfully! You will receive a confirmation soon.";
}
