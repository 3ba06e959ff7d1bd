use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::AppConfig;

const CREATE_SUGGESTIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS suggestions (
        id       BIGSERIAL PRIMARY KEY,
        name     VARCHAR(100),
        email    VARCHAR(100),
        category VARCHAR(50),
        message  TEXT,
        ai_reply TEXT NOT NULL DEFAULT '',
        date     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

// Tables created before ai_reply was part of the bootstrap lack the column.
const ADD_AI_REPLY: &str = r#"
    ALTER TABLE suggestions
        ADD COLUMN IF NOT EXISTS ai_reply TEXT NOT NULL DEFAULT ''
"#;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Makes sure the `suggestions` table exists with every column the queries touch.
/// Safe to run on every start.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query(CREATE_SUGGESTIONS)
        .execute(db)
        .await
        .context("create suggestions table")?;
    sqlx::query(ADD_AI_REPLY)
        .execute(db)
        .await
        .context("add ai_reply column")?;
    info!("suggestions schema ready");
    Ok(())
}
