//! Application layer: use cases and the token service.

pub mod config;
pub mod login;
pub mod profile;
pub mod register;
pub mod token_service;

pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use profile::{ProfileUseCase, UpdateProfileInput};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token_service::{SessionClaims, TokenService};
