pub mod admin;
pub mod application;
pub mod campaign;
pub mod common;
pub mod email;
pub mod material;
pub mod pagination;
pub mod point;
pub mod user;
pub mod withdrawal;
pub mod workflow;

pub use admin::*;
pub use application::*;
pub use campaign::*;
pub use common::*;
pub use email::*;
pub use material::*;
pub use pagination::*;
pub use point::*;
pub use user::*;
pub use withdrawal::*;
pub use workflow::*;
