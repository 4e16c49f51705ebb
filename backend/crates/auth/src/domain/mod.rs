//! Domain layer: entities, value objects and the repository trait.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{NewUser, User};
pub use repository::UserRepository;
