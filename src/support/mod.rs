pub mod errors;
pub mod id;
pub mod time;
