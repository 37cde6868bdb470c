//! Creates the store's tables directly from the entity definitions.
//!
//! The store runs against an in-memory database that is thrown away on shutdown,
//! so there are no migrations: every boot creates a fresh schema and seeds it.

use crate::error::Error;
use entity::prelude::{Accounts, Purchases, Toys};
use log::*;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};

/// Create the `accounts`, `toys` and `purchases` tables if they don't already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), Error> {
    create_table(db, Accounts).await?;
    create_table(db, Toys).await?;
    create_table(db, Purchases).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), Error>
where
    E: EntityTrait,
{
    debug!("Creating table {}", entity.table_name());

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Opens a private in-memory SQLite database with the schema already created.
///
/// The pool is pinned to a single connection: every SQLite connection to
/// `:memory:` gets its own empty database.
pub async fn in_memory_database() -> Result<DatabaseConnection, Error> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    create_tables(&db).await?;
    Ok(db)
}
