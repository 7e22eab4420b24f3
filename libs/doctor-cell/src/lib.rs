pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::slots::{filter_available, generate_slots, parse_hhmm, SlotError};
