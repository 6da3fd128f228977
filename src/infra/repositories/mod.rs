pub mod sqlite_appointment_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_connection_repo;
pub mod sqlite_timeline_repo;
