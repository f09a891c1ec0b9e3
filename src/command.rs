//! The line-based commands the `meeting-alert` host reads from its input

use std::str::FromStr;

use crate::dispatch::{Action, Key, UiEvent};
use crate::meeting::{MeetingForm, MeetingId};

pub const HELP: &str = "\
Commands:
    add <name> | <time> | <link>     add a meeting (time e.g. 2024-05-01T09:30)
    edit <id>                        open the edit form of a meeting
    save <name> | <time> | <link>    save the edit form
    close                            close the edit form
    click-outside | click-inside     click around or inside the edit form
    key <name>                       press a key (e.g. `key escape`)
    delete <id>                      delete a meeting (asks for confirmation)
    refresh                          redraw now
    show                             list meetings
    help                             show this help
    quit                             leave";

/// A line of input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Event(UiEvent),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], line[pos..].trim()),
            None => (line, ""),
        };

        let event = match verb.to_lowercase().as_str() {
            "add" => UiEvent::SubmitCreate(parse_form(rest)?),
            "save" => UiEvent::SubmitEdit(parse_form(rest)?),
            "edit" => UiEvent::Action { action: Action::OpenEdit, id: parse_id(rest)? },
            "delete" => UiEvent::Action { action: Action::Delete, id: parse_id(rest)? },
            "close" => UiEvent::CloseOverlay,
            "click-outside" => UiEvent::OverlayClick { inside: false },
            "click-inside" => UiEvent::OverlayClick { inside: true },
            "key" if rest.is_empty() == false => UiEvent::KeyPress(Key::from(rest)),
            "key" => return Err("which key?".to_string()),
            "refresh" => UiEvent::Tick,
            "show" | "list" => return Ok(Command::Show),
            "help" | "?" => return Ok(Command::Help),
            "quit" | "exit" => return Ok(Command::Quit),
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command {:?} (try `help`)", other)),
        };
        Ok(Command::Event(event))
    }
}

/// `<name> | <time> | <link>`. Missing fields are left empty, and rejected later on by validation.
fn parse_form(args: &str) -> Result<MeetingForm, String> {
    let mut fields = args.splitn(3, '|').map(str::trim);
    let name = fields.next().unwrap_or_default();
    let time = fields.next().unwrap_or_default();
    let link = fields.next().unwrap_or_default();
    Ok(MeetingForm::new(name, time, link))
}

fn parse_id(args: &str) -> Result<MeetingId, String> {
    args.parse()
        .map_err(|err| format!("invalid meeting id {:?}: {}", args, err))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
