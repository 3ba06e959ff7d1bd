use tracing::info;

use super::{
    repo,
    repo_types::{NewSuggestion, Suggestion},
};
use crate::{state::AppState, webhook::WebhookPayload};

/// Persist a suggestion, then hand it to the notifier without waiting on delivery.
pub async fn create_and_notify(st: &AppState, new: NewSuggestion) -> anyhow::Result<Suggestion> {
    let suggestion = repo::insert(&st.db, &new).await?;
    info!(id = suggestion.id, category = %suggestion.category, "suggestion created");
    st.notifier.notify(WebhookPayload::from(&suggestion));
    Ok(suggestion)
}
