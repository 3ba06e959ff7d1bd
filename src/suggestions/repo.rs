use sqlx::PgPool;

use super::repo_types::{NewSuggestion, Suggestion};

/// How many rows the list endpoint returns.
pub const RECENT_LIMIT: i64 = 5;

/// Newest suggestions first, at most [`RECENT_LIMIT`].
pub async fn list_recent(db: &PgPool) -> anyhow::Result<Vec<Suggestion>> {
    let rows = sqlx::query_as::<_, Suggestion>(
        r#"
        SELECT id,
               COALESCE(name, '')     AS name,
               COALESCE(email, '')    AS email,
               COALESCE(category, '') AS category,
               COALESCE(message, '')  AS message,
               date,
               ai_reply
          FROM suggestions
         ORDER BY date DESC, id DESC
         LIMIT $1
        "#,
    )
    .bind(RECENT_LIMIT)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Insert a suggestion and return the stored row, including the generated
/// `id` and `date`, in one round trip.
pub async fn insert(db: &PgPool, new: &NewSuggestion) -> anyhow::Result<Suggestion> {
    let row = sqlx::query_as::<_, Suggestion>(
        r#"
        INSERT INTO suggestions (name, email, category, message, ai_reply, date)
        VALUES ($1, $2, $3, $4, '', now())
        RETURNING id,
                  COALESCE(name, '')     AS name,
                  COALESCE(email, '')    AS email,
                  COALESCE(category, '') AS category,
                  COALESCE(message, '')  AS message,
                  date,
                  ai_reply
        "#,
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.category)
    .bind(&new.message)
    .fetch_one(db)
    .await?;
    Ok(row)
}
