pub mod applications;
pub mod bank_transfers;
pub mod campaigns;
pub mod creator_materials;
pub mod point_transactions;
pub mod user_profiles;
pub mod withdrawals;

pub use applications as application_entity;
pub use bank_transfers as bank_transfer_entity;
pub use campaigns as campaign_entity;
pub use creator_materials as creator_material_entity;
pub use point_transactions as point_transaction_entity;
pub use user_profiles as user_profile_entity;
pub use withdrawals as withdrawal_entity;

pub use applications::ApplicationStatus;
pub use campaigns::{CampaignStatus, Platform};
pub use point_transactions::PointTransactionType;
pub use user_profiles::{AccountType, UserRole};
pub use withdrawals::WithdrawalStatus;
