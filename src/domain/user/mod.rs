//! User aggregate (UserDirectory)
//!
//! Contains the User entity and the sign-up DTO with its format rules.

pub mod model;

mod dto_register;

pub use model::{User, UserRole, UserType};

pub use dto_register::{RegisterUserDto, MIN_PASSWORD_LEN};
