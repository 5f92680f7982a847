//! Initial schema: vehicles, trips, receipts, year summaries with their lock
//! history, and the audit log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vehicles::UserId).uuid().not_null())
                    .col(ColumnDef::new(Vehicles::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Vehicles::LicensePlate).string_len(20))
                    .col(ColumnDef::new(Vehicles::InitialMileage).big_integer().not_null())
                    .col(timestamp(Vehicles::CreatedAt))
                    .col(timestamp(Vehicles::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_user")
                    .table(Vehicles::Table)
                    .col(Vehicles::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Trips::UserId).uuid().not_null())
                    .col(ColumnDef::new(Trips::VehicleId).uuid().not_null())
                    .col(ColumnDef::new(Trips::Date).date().not_null())
                    .col(ColumnDef::new(Trips::StartOdometer).big_integer().not_null())
                    .col(ColumnDef::new(Trips::EndOdometer).big_integer().not_null())
                    .col(ColumnDef::new(Trips::Purpose).string_len(500))
                    .col(ColumnDef::new(Trips::IsBusiness).boolean().not_null().default(false))
                    .col(ColumnDef::new(Trips::IsDeleted).boolean().not_null().default(false))
                    .col(timestamp(Trips::CreatedAt))
                    .col(timestamp(Trips::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trips_vehicle")
                            .from(Trips::Table, Trips::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Overlap checks read every active interval of one vehicle.
        manager
            .create_index(
                Index::create()
                    .name("idx_trips_vehicle_active")
                    .table(Trips::Table)
                    .col(Trips::VehicleId)
                    .col(Trips::IsDeleted)
                    .col(Trips::StartOdometer)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_user_date")
                    .table(Trips::Table)
                    .col(Trips::UserId)
                    .col(Trips::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Receipts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Receipts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Receipts::VehicleId).uuid().not_null())
                    .col(ColumnDef::new(Receipts::Date).date().not_null())
                    .col(ColumnDef::new(Receipts::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Receipts::LitresMl).big_integer())
                    .col(ColumnDef::new(Receipts::Vendor).string_len(200))
                    .col(ColumnDef::new(Receipts::Note).string_len(500))
                    .col(ColumnDef::new(Receipts::IsDeleted).boolean().not_null().default(false))
                    .col(timestamp(Receipts::CreatedAt))
                    .col(timestamp(Receipts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receipts_vehicle")
                            .from(Receipts::Table, Receipts::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_receipts_user_date")
                    .table(Receipts::Table)
                    .col(Receipts::UserId)
                    .col(Receipts::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(YearSummaries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(YearSummaries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(YearSummaries::UserId).uuid().not_null())
                    .col(ColumnDef::new(YearSummaries::Year).integer().not_null())
                    .col(
                        ColumnDef::new(YearSummaries::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(YearSummaries::LockedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(YearSummaries::LockActor).uuid())
                    .col(ColumnDef::new(YearSummaries::LockReason).string_len(600))
                    .col(timestamp(YearSummaries::CreatedAt))
                    .col(timestamp(YearSummaries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // One summary per user and year.
        manager
            .create_index(
                Index::create()
                    .name("uq_year_summaries_user_year")
                    .table(YearSummaries::Table)
                    .col(YearSummaries::UserId)
                    .col(YearSummaries::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(YearLockEvents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(YearLockEvents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(YearLockEvents::SummaryId).uuid().not_null())
                    .col(ColumnDef::new(YearLockEvents::Action).string_len(16).not_null())
                    .col(ColumnDef::new(YearLockEvents::Actor).uuid().not_null())
                    .col(ColumnDef::new(YearLockEvents::Reason).string_len(500).not_null())
                    .col(timestamp(YearLockEvents::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_year_lock_events_summary")
                            .from(YearLockEvents::Table, YearLockEvents::SummaryId)
                            .to(YearSummaries::Table, YearSummaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_year_lock_events_summary")
                    .table(YearLockEvents::Table)
                    .col(YearLockEvents::SummaryId)
                    .col(YearLockEvents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityType).string_len(32).not_null())
                    .col(ColumnDef::new(AuditLogs::EntityId).uuid().not_null())
                    .col(ColumnDef::new(AuditLogs::Action).string_len(32).not_null())
                    .col(ColumnDef::new(AuditLogs::Details).json().not_null())
                    .col(timestamp(AuditLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_entity")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::EntityType)
                    .col(AuditLogs::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(YearLockEvents::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(YearSummaries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Receipts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    UserId,
    Name,
    LicensePlate,
    InitialMileage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Trips {
    Table,
    Id,
    UserId,
    VehicleId,
    Date,
    StartOdometer,
    EndOdometer,
    Purpose,
    IsBusiness,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Receipts {
    Table,
    Id,
    UserId,
    VehicleId,
    Date,
    AmountCents,
    LitresMl,
    Vendor,
    Note,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum YearSummaries {
    Table,
    Id,
    UserId,
    Year,
    IsLocked,
    LockedAt,
    LockActor,
    LockReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum YearLockEvents {
    Table,
    Id,
    SummaryId,
    Action,
    Actor,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    EntityType,
    EntityId,
    Action,
    Details,
    CreatedAt,
}
