use stockbot_core::{AppViewModel, Destination, LogEntry, LogLevel, Notification, ResetPrompt, Tab};

/// Incremental text renderer.
///
/// Log lines are printed once as they arrive; the form is reprinted only when
/// it changed.
#[derive(Debug, Default)]
pub struct Renderer {
    printed_logs: usize,
    last_form: Option<String>,
    last_notification: Option<Notification>,
    last_prompt: Option<ResetPrompt>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines to print for `view`, given what was printed before.
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        let form = format_form(view);
        if self.last_form.as_deref() != Some(form.as_str()) {
            lines.push(form.clone());
            self.last_form = Some(form);
        }

        if view.logs.len() < self.printed_logs {
            lines.push("(log cleared)".to_string());
            self.printed_logs = 0;
        }
        lines.extend(view.logs[self.printed_logs..].iter().map(format_log));
        self.printed_logs = view.logs.len();

        if view.notification != self.last_notification {
            if let Some(notification) = &view.notification {
                lines.push(format_notification(notification));
            }
            self.last_notification = view.notification.clone();
        }

        if view.reset_prompt != self.last_prompt {
            if let Some(prompt) = &view.reset_prompt {
                lines.push(format!("? {} {} [yes/no]", prompt.title, prompt.description));
            }
            self.last_prompt = view.reset_prompt.clone();
        }

        lines
    }

    /// Forget the printed form so the next render shows it again.
    pub fn force_form(&mut self) {
        self.last_form = None;
    }
}

pub fn format_form(view: &AppViewModel) -> String {
    let tabs = [Tab::Input, Tab::Data]
        .iter()
        .map(|tab| {
            if *tab == view.active_tab {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let destinations = Destination::ALL
        .iter()
        .map(|d| {
            let mark = if view.destinations.is_enabled(*d) { 'x' } else { ' ' };
            format!("[{mark}] {}", d.label())
        })
        .collect::<Vec<_>>()
        .join("  ");

    let mut out = format!("{tabs}    {destinations}\n");
    if view.rows.is_empty() {
        out.push_str("  (no rows)\n");
    }
    for (index, row) in view.rows.iter().enumerate() {
        let flag = if row.has_error { '!' } else { ' ' };
        let files = match row.attachment_count {
            0 => "No files".to_string(),
            n => format!("{n} file(s)"),
        };
        out.push_str(&format!(
            "{flag}{:>3}. {:<14} {:<12} {:<20} {:<20} {}\n",
            index + 1,
            or_dash(&row.isin),
            or_dash(&row.code),
            or_dash(&row.name),
            or_dash(&row.comment),
            files
        ));
    }
    out.trim_end().to_string()
}

pub fn format_log(entry: &LogEntry) -> String {
    let tag = match entry.level() {
        LogLevel::Info => "     ",
        LogLevel::Step => "STEP ",
        LogLevel::Warning => "WARN ",
        LogLevel::Error => "ERROR",
    };
    format!("{} - {tag} {}", entry.timestamp(), entry.message())
}

fn format_notification(notification: &Notification) -> String {
    let marker = if notification.destructive { "!!" } else { "**" };
    format!(
        "{marker} {}: {} {marker}",
        notification.title, notification.description
    )
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}
