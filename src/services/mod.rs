pub mod admin_service;
pub mod application_service;
pub mod auth_service;
pub mod campaign_service;
pub mod mail_service;
pub mod material_service;
pub mod point_service;
pub mod profile_service;
pub mod withdrawal_service;

pub use admin_service::*;
pub use application_service::*;
pub use auth_service::*;
pub use campaign_service::*;
pub use mail_service::*;
pub use material_service::*;
pub use point_service::*;
pub use profile_service::*;
pub use withdrawal_service::*;
