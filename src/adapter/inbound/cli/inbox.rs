//! Handler for the `inbox` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::InboxArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::id::{NotificationId, UserId};
use crate::domain::notification::NotificationRecord;
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;
use crate::port::inbound::operator::user::InboxRequest;

#[derive(Tabled)]
struct InboxRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Channel")]
    channel: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&NotificationRecord> for InboxRow {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            id: record.id.value(),
            channel: record.channel.as_str(),
            status: record.status.as_str(),
            title: record.title.clone(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn build_inbox_request(args: &InboxArgs) -> InboxRequest {
    InboxRequest {
        user_id: UserId::new(args.user.as_str()),
        unread_only: args.unread,
        limit: args.limit,
        mark_read: args.mark_read.map(NotificationId::new),
    }
}

/// Execute `inbox`.
pub fn execute(service: &dyn OperatorPort, config_toml: &str, args: &InboxArgs) -> Result<()> {
    let view = service.inbox(config_toml, &build_inbox_request(args))?;
    let user = &view.user_id;

    if output::is_json() {
        output::json_output(json!({
            "command": "inbox",
            "inbox": view,
        }));
        return Ok(());
    }

    if let (Some(marked), Some(id)) = (view.marked, args.mark_read) {
        if marked {
            output::success(&format!("Marked notification {id} as read"));
        } else {
            output::warning(&format!("No unread notification {id} for {user}"));
        }
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section(&format!("Inbox for {user}"));
    output::field("Unread", view.unread());
    if view.notifications.is_empty() {
        output::note("(empty)");
        return Ok(());
    }

    let rows: Vec<InboxRow> = view.notifications.iter().map(InboxRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    if output::verbosity() > 0 {
        for record in &view.notifications {
            output::section(&record.title);
            output::lines(&record.message);
            if let Some(error) = &record.error_message {
                output::warning(error);
            }
        }
    }
    Ok(())
}
