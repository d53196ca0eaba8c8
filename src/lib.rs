pub mod clock;
pub mod color;
pub mod config;
pub mod entities;
pub mod error;
pub mod factory;
pub mod screen;
pub mod target;
pub mod value_changer;
