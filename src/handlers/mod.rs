pub mod admin;
pub mod application;
pub mod auth;
pub mod campaign;
pub mod email;
pub mod material;
pub mod point;
pub mod profile;
pub mod withdrawal;

pub use admin::admin_config;
pub use application::application_config;
pub use auth::auth_config;
pub use campaign::campaign_config;
pub use email::email_config;
pub use material::material_config;
pub use point::point_config;
pub use profile::profile_config;
pub use withdrawal::withdrawal_config;
