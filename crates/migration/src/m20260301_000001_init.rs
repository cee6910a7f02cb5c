//! Initial schema migration.
//!
//! Creates the complete Itinera schema:
//!
//! - `users`: identities resolved from bearer tokens
//! - `trips`: itineraries owned by one user (soft-deletable)
//! - `cities`: ordered stops of a trip
//! - `activities`: ordered, dated events inside a city
//! - `budget_items`: ad-hoc expenses attached to a trip
//! - `shared_trips`: public share tokens (one per trip)
//!
//! Ownership is strictly hierarchical and every child declares
//! `ON DELETE CASCADE` towards its parent.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    AccessToken,
    CreatedAt,
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    StartDate,
    EndDate,
    TotalBudgetMinor,
    TotalSpentMinor,
    Currency,
    Status,
    TripType,
    CategoryBreakdown,
    CustomBudgets,
    Tags,
    ShareToken,
    IsPublic,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
    TripId,
    Name,
    Country,
    State,
    Position,
    ArrivalDate,
    DepartureDate,
    Notes,
    EstimatedBudgetMinor,
    ActualSpentMinor,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    CityId,
    Name,
    Description,
    Category,
    CostMinor,
    Date,
    Time,
    DurationMinutes,
    Position,
    Location,
    Priority,
    IsBooked,
    BookingReference,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum BudgetItems {
    Table,
    Id,
    TripId,
    Name,
    Description,
    Category,
    BudgetedMinor,
    ActualMinor,
    Currency,
    Date,
    IsPaid,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum SharedTrips {
    Table,
    Id,
    TripId,
    ShareToken,
    IsPublic,
    Views,
    ExpiresAt,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string())
                    .col(
                        ColumnDef::new(Users::AccessToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::OwnerId).string().not_null())
                    .col(ColumnDef::new(Trips::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Trips::Description).text())
                    .col(ColumnDef::new(Trips::StartDate).date().not_null())
                    .col(ColumnDef::new(Trips::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Trips::TotalBudgetMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Trips::TotalSpentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Trips::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Trips::Status)
                            .string()
                            .not_null()
                            .default("planning"),
                    )
                    .col(
                        ColumnDef::new(Trips::TripType)
                            .string()
                            .not_null()
                            .default("solo"),
                    )
                    .col(
                        ColumnDef::new(Trips::CategoryBreakdown)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Trips::CustomBudgets)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Trips::Tags).text().not_null().default("[]"))
                    .col(ColumnDef::new(Trips::ShareToken).string_len(64))
                    .col(
                        ColumnDef::new(Trips::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Trips::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Trips::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Trips::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-owner_id")
                            .from(Trips::Table, Trips::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-owner_id-created_at")
                    .table(Trips::Table)
                    .col(Trips::OwnerId)
                    .col(Trips::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-share_token")
                    .table(Trips::Table)
                    .col(Trips::ShareToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Cities
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cities::TripId).string().not_null())
                    .col(ColumnDef::new(Cities::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Cities::Country).string_len(100).not_null())
                    .col(ColumnDef::new(Cities::State).string_len(100))
                    .col(ColumnDef::new(Cities::Position).integer().not_null())
                    .col(ColumnDef::new(Cities::ArrivalDate).date())
                    .col(ColumnDef::new(Cities::DepartureDate).date())
                    .col(ColumnDef::new(Cities::Notes).text())
                    .col(
                        ColumnDef::new(Cities::EstimatedBudgetMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Cities::ActualSpentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Cities::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Cities::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cities-trip_id")
                            .from(Cities::Table, Cities::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cities-trip_id-position")
                    .table(Cities::Table)
                    .col(Cities::TripId)
                    .col(Cities::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Activities
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::CityId).string().not_null())
                    .col(ColumnDef::new(Activities::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Activities::Description).text())
                    .col(
                        ColumnDef::new(Activities::Category)
                            .string()
                            .not_null()
                            .default("sightseeing"),
                    )
                    .col(
                        ColumnDef::new(Activities::CostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Activities::Date).date().not_null())
                    .col(ColumnDef::new(Activities::Time).time())
                    .col(ColumnDef::new(Activities::DurationMinutes).integer())
                    .col(ColumnDef::new(Activities::Position).integer().not_null())
                    .col(ColumnDef::new(Activities::Location).string_len(300))
                    .col(
                        ColumnDef::new(Activities::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Activities::IsBooked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Activities::BookingReference).string_len(100))
                    .col(ColumnDef::new(Activities::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Activities::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activities-city_id")
                            .from(Activities::Table, Activities::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-activities-city_id-position")
                    .table(Activities::Table)
                    .col(Activities::CityId)
                    .col(Activities::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Budget items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetItems::TripId).string().not_null())
                    .col(ColumnDef::new(BudgetItems::Name).string().not_null())
                    .col(ColumnDef::new(BudgetItems::Description).text())
                    .col(ColumnDef::new(BudgetItems::Category).string().not_null())
                    .col(
                        ColumnDef::new(BudgetItems::BudgetedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetItems::ActualMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetItems::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(BudgetItems::Date).date())
                    .col(
                        ColumnDef::new(BudgetItems::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BudgetItems::Notes).text())
                    .col(ColumnDef::new(BudgetItems::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_items-trip_id")
                            .from(BudgetItems::Table, BudgetItems::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_items-trip_id")
                    .table(BudgetItems::Table)
                    .col(BudgetItems::TripId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Shared trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SharedTrips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharedTrips::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SharedTrips::TripId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SharedTrips::ShareToken)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SharedTrips::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SharedTrips::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SharedTrips::ExpiresAt).timestamp())
                    .col(ColumnDef::new(SharedTrips::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shared_trips-trip_id")
                            .from(SharedTrips::Table, SharedTrips::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(SharedTrips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
