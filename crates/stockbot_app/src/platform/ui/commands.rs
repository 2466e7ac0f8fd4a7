use stockbot_core::{AppViewModel, Attachment, Destination, Msg, RowField, Tab};
use thiserror::Error;

pub const HELP: &str = "\
Commands (rows are numbered from 1 in the active tab):
  tab input|data              switch tab
  add                         append an empty row
  del <row>                   delete a row
  set <row> <field> <text>    field: isin, code, name, comment
  files <row> [path...]       replace attached images (none clears)
  toggle <destination>        moneycontrol, report, tradingview
  start | abort | folder      run control
  reset, then yes | no        reset the active tab
  clear                       clear the log
  dismiss                     hide the current notification
  show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("no row {0} in this tab")]
    NoSuchRow(String),
}

/// Turn one input line into a command, resolving row numbers against `view`.
pub fn parse_command(line: &str, view: &AppViewModel) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "tab" => {
            let tab = match words.next().map(str::to_ascii_lowercase).as_deref() {
                Some("input") => Tab::Input,
                Some("data") => Tab::Data,
                _ => return Err(CommandError::Usage("tab input|data")),
            };
            Command::Dispatch(Msg::TabSelected(tab))
        }
        "add" => Command::Dispatch(Msg::AddRowClicked),
        "del" | "delete" => {
            let id = row_id(words.next(), view, "del <row>")?;
            Command::Dispatch(Msg::DeleteRowClicked(id))
        }
        "set" => {
            let usage = "set <row> isin|code|name|comment <text>";
            let id = row_id(words.next(), view, usage)?;
            let field = match words.next().map(str::to_ascii_lowercase).as_deref() {
                Some("isin") => RowField::Isin,
                Some("code") => RowField::Code,
                Some("name") => RowField::Name,
                Some("comment") => RowField::Comment,
                _ => return Err(CommandError::Usage(usage)),
            };
            let value = words.collect::<Vec<_>>().join(" ");
            Command::Dispatch(Msg::RowFieldEdited { id, field, value })
        }
        "files" => {
            let id = row_id(words.next(), view, "files <row> [path...]")?;
            let files = words.map(Attachment::new).collect();
            Command::Dispatch(Msg::RowFilesChanged { id, files })
        }
        "toggle" => {
            let destination = match words.next().map(str::to_ascii_lowercase).as_deref() {
                Some("moneycontrol") => Destination::Moneycontrol,
                Some("report") | Some("stockreport") => Destination::StockReport,
                Some("tradingview") => Destination::Tradingview,
                _ => return Err(CommandError::Usage("toggle moneycontrol|report|tradingview")),
            };
            Command::Dispatch(Msg::DestinationToggled(destination))
        }
        "start" => Command::Dispatch(Msg::StartClicked),
        "abort" => Command::Dispatch(Msg::AbortClicked),
        "folder" => Command::Dispatch(Msg::OpenFolderClicked),
        "reset" => Command::Dispatch(Msg::ResetClicked),
        "yes" | "y" => Command::Dispatch(Msg::ResetConfirmed),
        "no" | "n" => Command::Dispatch(Msg::ResetCancelled),
        "clear" => Command::Dispatch(Msg::ClearLogsClicked),
        "dismiss" => Command::Dispatch(Msg::NotificationDismissed),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn row_id(
    word: Option<&str>,
    view: &AppViewModel,
    usage: &'static str,
) -> Result<stockbot_core::RowId, CommandError> {
    let word = word.ok_or(CommandError::Usage(usage))?;
    let index: usize = word.parse().map_err(|_| CommandError::Usage(usage))?;
    index
        .checked_sub(1)
        .and_then(|i| view.rows.get(i))
        .map(|row| row.id)
        .ok_or_else(|| CommandError::NoSuchRow(word.to_string()))
}
