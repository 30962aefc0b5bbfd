pub mod id;
pub mod in_flight;
pub mod time;
