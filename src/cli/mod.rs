pub mod home;
pub mod setup;
pub mod ui;
