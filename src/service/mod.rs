pub mod alarm;
pub mod calendar_gateway;
pub mod date_parser;
pub mod responder;
pub mod routing;
pub mod theme;
pub mod welcome;
