pub mod error;
pub mod events;
pub mod fetch;
pub mod models;
pub mod nasa;
pub mod view;
