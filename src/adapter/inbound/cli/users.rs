//! Handlers for the `users` command group.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::domain::preference::UserNotificationPreference;
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;

/// A users file holds one preference record or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Many(Vec<UserNotificationPreference>),
    One(Box<UserNotificationPreference>),
}

impl ImportFile {
    fn into_vec(self) -> Vec<UserNotificationPreference> {
        match self {
            Self::Many(users) => users,
            Self::One(user) => vec![*user],
        }
    }
}

fn parse_import(content: &str) -> Result<Vec<UserNotificationPreference>> {
    let file: ImportFile = serde_json::from_str(content)?;
    Ok(file.into_vec())
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Channels")]
    channels: String,
    #[tabled(rename = "Min %")]
    min_profit: String,
    #[tabled(rename = "Max/h")]
    max_per_hour: u32,
    #[tabled(rename = "Exchanges")]
    exchanges: String,
    #[tabled(rename = "Assets")]
    assets: String,
}

fn join_or_default<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        return "(tier default)".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&UserNotificationPreference> for UserRow {
    fn from(prefs: &UserNotificationPreference) -> Self {
        Self {
            user: prefs.user_id.to_string(),
            tier: prefs.tier.clone(),
            channels: prefs
                .channels
                .iter()
                .map(|channel| channel.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            min_profit: prefs.min_profit_threshold.to_string(),
            max_per_hour: prefs.max_notifications_per_hour,
            exchanges: join_or_default(&prefs.preferred_exchanges),
            assets: join_or_default(&prefs.preferred_assets),
        }
    }
}

/// Execute `users import`.
pub fn execute_import(service: &dyn OperatorPort, config_toml: &str, path: &Path) -> Result<()> {
    let users = parse_import(&fs::read_to_string(path)?)?;
    let report = service.import_users(config_toml, users)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "users.import",
            "report": report,
        }));
        return Ok(());
    }

    for unknown in &report.unknown_tiers {
        output::warning(&format!(
            "{}: unknown tier '{}', free limits apply",
            unknown.user_id, unknown.tier
        ));
    }
    output::success(&format!("Imported {} user(s)", report.imported));
    Ok(())
}

/// Execute `users list`.
pub fn execute_list(service: &dyn OperatorPort, config_toml: &str) -> Result<()> {
    let users = service.list_users(config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "users.list",
            "users": users,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section("Active Users");
    if users.is_empty() {
        output::note("(none)");
        return Ok(());
    }
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::Channel;
    use rust_decimal_macros::dec;

    #[test]
    fn import_accepts_a_single_record() {
        let users = parse_import(r#"{"user_id": "alice"}"#).unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0], UserNotificationPreference::new("alice"));
    }

    #[test]
    fn import_accepts_an_array_with_overrides() {
        let users = parse_import(
            r#"[
                {"user_id": "alice", "tier": "pro", "channels": ["in_app", "email"],
                 "contacts": {"email_address": "alice@example.com"},
                 "min_profit_threshold": "1.5"},
                {"user_id": "bob", "preferred_assets": ["bitcoin"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].tier, "pro");
        assert!(users[0].channels.contains(&Channel::Email));
        assert_eq!(users[0].min_profit_threshold, dec!(1.5));
        assert_eq!(users[1].preferred_assets.len(), 1);
    }

    #[test]
    fn import_rejects_records_without_user_id() {
        assert!(parse_import(r#"[{"tier": "pro"}]"#).is_err());
    }

    #[test]
    fn row_marks_empty_preferences_as_tier_default() {
        let row = UserRow::from(&UserNotificationPreference::new("carol"));

        assert_eq!(row.channels, "in_app");
        assert_eq!(row.exchanges, "(tier default)");
        assert_eq!(row.max_per_hour, 10);
    }
}
