pub mod booking;
pub mod integration;
pub mod schedule;
pub mod slots;
pub mod token_lifecycle;
