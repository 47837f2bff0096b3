use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_vendors_table::Migration),
            Box::new(m20260101_000002_create_purchase_orders_table::Migration),
            Box::new(m20260101_000003_create_historical_performance_table::Migration),
        ]
    }
}

// Migration implementations

mod m20260101_000001_create_vendors_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create vendors table aligned with entities::vendor Model
            manager
                .create_table(
                    Table::create()
                        .table(Vendors::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Vendors::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Vendors::Name).string().not_null())
                        .col(ColumnDef::new(Vendors::ContactDetails).text().not_null())
                        .col(ColumnDef::new(Vendors::Address).text().not_null())
                        .col(
                            ColumnDef::new(Vendors::VendorCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Vendors::OnTimeDeliveryRate)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::QualityRatingAvg)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::AverageResponseTime)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::FulfillmentRate)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vendors::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vendors::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Vendors {
        Table,
        Id,
        Name,
        ContactDetails,
        Address,
        VendorCode,
        OnTimeDeliveryRate,
        QualityRatingAvg,
        AverageResponseTime,
        FulfillmentRate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000002_create_purchase_orders_table {
    use super::m20260101_000001_create_vendors_table::Vendors;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::PoNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::VendorId).uuid().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::DeliveryDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Items).json().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string_len(32)
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(PurchaseOrders::QualityRating).double().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::IssueDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::AcknowledgmentDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_vendor_id")
                                .from(PurchaseOrders::Table, PurchaseOrders::VendorId)
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_vendor_id")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::VendorId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum PurchaseOrders {
        Table,
        Id,
        PoNumber,
        VendorId,
        OrderDate,
        DeliveryDate,
        Items,
        Quantity,
        Status,
        QualityRating,
        IssueDate,
        AcknowledgmentDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000003_create_historical_performance_table {
    use super::m20260101_000001_create_vendors_table::Vendors;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_historical_performance_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(HistoricalPerformance::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(HistoricalPerformance::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformance::VendorId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformance::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformance::OnTimeDeliveryRate)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformance::QualityRatingAvg)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformance::AverageResponseTime)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformance::FulfillmentRate)
                                .double()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_historical_performance_vendor_id")
                                .from(
                                    HistoricalPerformance::Table,
                                    HistoricalPerformance::VendorId,
                                )
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_historical_performance_vendor_id")
                        .table(HistoricalPerformance::Table)
                        .col(HistoricalPerformance::VendorId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(HistoricalPerformance::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum HistoricalPerformance {
        Table,
        Id,
        VendorId,
        Date,
        OnTimeDeliveryRate,
        QualityRatingAvg,
        AverageResponseTime,
        FulfillmentRate,
    }
}
