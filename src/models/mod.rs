pub mod booking;
pub mod calendar_event;
pub mod message;
