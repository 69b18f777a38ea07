pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_user_profiles;
mod m20250901_000002_create_campaigns;
mod m20250901_000003_create_applications;
mod m20250902_000001_create_point_ledger;
mod m20250903_000001_create_creator_materials;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_user_profiles::Migration),
            Box::new(m20250901_000002_create_campaigns::Migration),
            Box::new(m20250901_000003_create_applications::Migration),
            Box::new(m20250902_000001_create_point_ledger::Migration),
            Box::new(m20250903_000001_create_creator_materials::Migration),
        ]
    }
}
