pub mod add;
pub mod config;
pub mod delete;
pub mod fields;
pub mod update;
pub mod view;
