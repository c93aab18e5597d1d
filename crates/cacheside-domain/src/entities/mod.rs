//! Domain entities

pub mod entity;
pub mod user;

pub use entity::{Entity, FromCreate};
pub use user::{CreateUserDto, UpdateUserDto, User};
