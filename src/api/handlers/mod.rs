pub mod availability;
pub mod blocked_date;
pub mod booking;
pub mod health;
pub mod integration;
pub mod slots;
