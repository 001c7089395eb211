pub mod forms;
pub mod goals;
pub mod setup;
pub mod summary;
pub mod ui;
