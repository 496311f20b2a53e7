use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::{NotificationQuery, SortOrder};
use crate::domain::NotificationKind;

use super::usage_error;

const LIST_USAGE: &str = "notifications [kind] [--oldest]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "notifications",
            "Show the activity feed, optionally filtered by kind",
            LIST_USAGE,
            cmd_notifications,
        ),
        CommandEntry::new(
            "read",
            "Mark one notification as read",
            "read <id>",
            cmd_read,
        ),
        CommandEntry::new(
            "read-all",
            "Mark every notification as read",
            "read-all",
            cmd_read_all,
        ),
    ]
}

fn cmd_notifications(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut query = NotificationQuery::default();
    for arg in args {
        if *arg == "--oldest" {
            query.order = SortOrder::OldestFirst;
        } else {
            let kind = arg
                .parse::<NotificationKind>()
                .map_err(CommandError::InvalidArguments)?;
            query.kind = Some(kind);
        }
    }

    let entries = context.notifications.query(&query);
    output::section(format!(
        "Notifications ({} unread)",
        context.notifications.unread_count()
    ));
    if entries.is_empty() {
        output::info("No notifications yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.to_string(),
                if entry.read { " " } else { "*" }.to_string(),
                entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                entry.kind.to_string(),
                entry.message.clone(),
            ]
        })
        .collect();
    output::print_table(&["ID", "New", "When", "Kind", "Message"], &rows);
    Ok(())
}

fn cmd_read(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage_error("read <id>"));
    };
    let id: u64 = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid notification id `{raw}`")))?;
    match context.notifications.get(id) {
        None => output::warning(format!("No notification with id {id}.")),
        Some(entry) if entry.read => output::info(format!("Notification {id} was already read.")),
        Some(_) => {
            context.notifications.mark_read(id);
            output::success(format!("Notification {id} marked as read."));
        }
    }
    Ok(())
}

fn cmd_read_all(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let changed = context.notifications.mark_all_read();
    output::success(format!("Marked {changed} notification(s) as read."));
    Ok(())
}
