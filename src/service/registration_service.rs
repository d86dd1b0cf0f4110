use tracing::info;

use crate::error::{BotError, Result};
use crate::store::{GROUPS_KEY, GroupStore};

pub struct RegistrationService;

impl RegistrationService {
    /// Checks the caller's token, then appends the submitted group names
    /// (comma-separated, blanks dropped) to the tracked set. Returns the
    /// confirmation line, which reports the full resulting list.
    ///
    /// The token gate runs before the group check, so an unauthenticated
    /// caller never learns which fields were missing. Repeat names are
    /// stored again rather than deduplicated.
    pub async fn register<S: GroupStore + ?Sized>(
        store: &S,
        admin_token: &str,
        token: Option<&str>,
        group: Option<&str>,
    ) -> Result<String> {
        if token != Some(admin_token) {
            return Err(BotError::Authentication);
        }
        let group = match group {
            Some(value) if !value.is_empty() => value,
            _ => return Err(BotError::Validation),
        };

        let existing = store.get(GROUPS_KEY).await?.unwrap_or_default();
        let mut groups: Vec<String> = existing
            .split(',')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        groups.extend(
            group
                .split(',')
                .filter(|part| !part.is_empty())
                .map(str::to_string),
        );

        store.put(GROUPS_KEY, &groups.join(",")).await?;
        info!("registration accepted, {} groups tracked", groups.len());

        Ok(format!(
            "Added {} to store, currently {} groups stored",
            groups.join(", "),
            groups.len()
        ))
    }

    /// The tracked set as individual names, blanks dropped. An absent key
    /// reads as an empty set.
    pub async fn tracked_groups<S: GroupStore + ?Sized>(store: &S) -> Result<Vec<String>> {
        let data = store.get(GROUPS_KEY).await?.unwrap_or_default();
        Ok(data
            .split(',')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect())
    }
}
