use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement, TransactionTrait};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // 开启事务，建表和索引要么全部成功要么全部回滚
        let txn = conn.begin().await?;

        create_conferences_table(&txn).await?;
        create_teams_table(&txn).await?;
        create_games_table(&txn).await?;
        create_indexes(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let txn = conn.begin().await?;

        // games 引用 teams / conferences，需先删除
        for table in ["games", "teams", "conferences"] {
            txn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(r#"DROP TABLE IF EXISTS "{}""#, table),
            ))
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

/// 联盟表（自然键：name, sport, division, gender）
async fn create_conferences_table<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE IF NOT EXISTS "conferences" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "name" TEXT NOT NULL,
            "sport" TEXT NOT NULL,
            "division" TEXT NOT NULL,
            "gender" TEXT,
            "level" TEXT NOT NULL,
            "created_at" INTEGER,
            "updated_at" INTEGER
        )"#,
    ))
    .await?;
    Ok(())
}

/// 球队表（自然键同联盟表，conference 仅记录首次出现时的联盟名称）
async fn create_teams_table<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE IF NOT EXISTS "teams" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "name" TEXT NOT NULL,
            "sport" TEXT NOT NULL,
            "division" TEXT NOT NULL,
            "gender" TEXT,
            "level" TEXT NOT NULL,
            "conference" TEXT,
            "created_at" INTEGER,
            "updated_at" INTEGER
        )"#,
    ))
    .await?;
    Ok(())
}

/// 比赛表，game_id 唯一约束是幂等导入的最后一道防线
async fn create_games_table<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE IF NOT EXISTS "games" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "game_id" TEXT NOT NULL UNIQUE,
            "date" TEXT NOT NULL,
            "sport" TEXT NOT NULL,
            "division" TEXT NOT NULL,
            "gender" TEXT,
            "home_team_id" INTEGER NOT NULL,
            "away_team_id" INTEGER NOT NULL,
            "home_conference_id" INTEGER,
            "away_conference_id" INTEGER,
            "home_score" INTEGER,
            "away_score" INTEGER,
            "status" TEXT NOT NULL DEFAULT 'scheduled',
            "start_time" TEXT,
            "venue" TEXT,
            "data_source" TEXT NOT NULL,
            "created_at" INTEGER,
            "updated_at" INTEGER,
            FOREIGN KEY("home_team_id") REFERENCES "teams"("id"),
            FOREIGN KEY("away_team_id") REFERENCES "teams"("id"),
            FOREIGN KEY("home_conference_id") REFERENCES "conferences"("id"),
            FOREIGN KEY("away_conference_id") REFERENCES "conferences"("id")
        )"#,
    ))
    .await?;
    Ok(())
}

async fn create_indexes<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let indexes = [
        r#"CREATE INDEX IF NOT EXISTS "idx_teams_natural_key" ON "teams" ("name", "sport", "division", "gender")"#,
        r#"CREATE INDEX IF NOT EXISTS "idx_conferences_natural_key" ON "conferences" ("name", "sport", "division", "gender")"#,
        r#"CREATE INDEX IF NOT EXISTS "idx_games_date" ON "games" ("date")"#,
    ];

    for sql in indexes {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await?;
    }
    Ok(())
}
