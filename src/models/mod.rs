// Data models and plan schema structures

pub mod plan;
pub mod profile;
pub mod user;

pub use plan::*;
pub use profile::*;
pub use user::*;
