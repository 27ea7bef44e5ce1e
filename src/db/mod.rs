pub mod activity;
pub mod contacts;
pub mod events;
pub mod groups;
pub mod metrics;
pub mod quotes;
pub mod users;
pub mod vendors;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Create a SeaORM database connection pool for `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    opts.sqlx_logging(false);
    Database::connect(opts).await
}
