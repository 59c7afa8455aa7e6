use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use scopecrate::{
    Conditions, FilterConfig, FilterDefinition, FilterType, Pagination, PaginationOptions,
    SortConfig,
};

pub mod follower_entity;

use follower_entity::{Column as FollowerColumn, Entity as FollowerEntity};

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// The filter and sort registry every test shares for the follower resource.
pub fn follower_definition() -> Arc<FilterDefinition> {
    Arc::new(
        FilterDefinition::new()
            .add_filter("name", FilterConfig::new(FilterType::String, "name"))
            .add_filter("email", FilterConfig::new(FilterType::String, "email"))
            .add_filter("q", FilterConfig::search(&["name", "email"]))
            .add_filter(
                "status",
                FilterConfig::new(FilterType::Enum, "status")
                    .enum_values(&["active", "inactive"]),
            )
            .add_filter("points", FilterConfig::new(FilterType::Number, "points"))
            .add_filter("joined_on", FilterConfig::new(FilterType::Date, "joined_on"))
            .add_sort("id", SortConfig::new("id"))
            .add_sort("name", SortConfig::new("name"))
            .add_sort("points", SortConfig::new("points"))
            .add_sort("email", SortConfig::new("email").disabled()),
    )
}

/// Build a `Pagination` over the follower definition from literal query
/// parameters.
pub fn follower_pagination(entries: &[(&str, &str)]) -> Pagination {
    let mut conditions = Conditions::new();
    for (key, value) in entries {
        conditions
            .entry((*key).to_string())
            .or_default()
            .push((*value).to_string());
    }
    Pagination::new(conditions, follower_definition(), PaginationOptions::default())
}

pub fn follower(name: &str, email: &str, status: &str, points: i32, joined_on: &str) -> follower_entity::ActiveModel {
    follower_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        status: Set(status.to_string()),
        points: Set(points),
        joined_on: Set(parse_date(joined_on)),
    }
}

pub fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Four followers with distinct names, statuses, point counts and join dates.
pub async fn seed_followers(db: &DatabaseConnection) -> Result<(), DbErr> {
    let rows = [
        ("John Carter", "john@example.com", "active", 120, "2024-01-15"),
        ("Jane Carter", "jane@example.com", "active", 80, "2024-02-20"),
        ("Billy Zane", "billy@example.com", "inactive", 25, "2023-11-05"),
        ("Ann Veal", "ann@example.com", "inactive", 300, "2024-05-30"),
    ];
    for (name, email, status, points, joined_on) in rows {
        follower(name, email, status, points, joined_on)
            .insert(db)
            .await?;
    }
    Ok(())
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateFollowerTable)]
    }
}

pub struct CreateFollowerTable;

impl MigrationName for CreateFollowerTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_follower_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateFollowerTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(FollowerEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(FollowerColumn::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(FollowerColumn::Name).string().not_null())
            .col(
                ColumnDef::new(FollowerColumn::Email)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(FollowerColumn::Status).string().not_null())
            .col(ColumnDef::new(FollowerColumn::Points).integer().not_null())
            .col(ColumnDef::new(FollowerColumn::JoinedOn).date().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowerEntity).to_owned())
            .await?;
        Ok(())
    }
}
