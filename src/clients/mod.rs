pub mod google_calendar;
