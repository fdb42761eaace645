use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_stores_table;
mod m20240101_000003_create_ratings_table;
mod m20240101_000004_create_audit_logs_table;

/// Database migrator for SeaORM
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_stores_table::Migration),
            Box::new(m20240101_000003_create_ratings_table::Migration),
            Box::new(m20240101_000004_create_audit_logs_table::Migration),
        ]
    }
}

/// Auto-increment primary key
///
/// SQLite only auto-increments `INTEGER PRIMARY KEY`, which is 64-bit there.
fn id_column<T: IntoIden>(manager: &SchemaManager, name: T) -> ColumnDef {
    let mut def = ColumnDef::new(name);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => def.integer(),
        _ => def.big_integer(),
    };
    def.not_null().auto_increment().primary_key();
    def
}
