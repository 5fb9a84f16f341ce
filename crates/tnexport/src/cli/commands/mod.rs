pub mod calculate;
pub mod contacts;
pub mod database;
pub mod projects;
pub mod sheets;
