pub mod appointment;
pub mod availability;
pub mod connection;
pub mod slot;
