//! Shell command parsing

use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  drives                  list drives
  use <drive>             switch to a drive
  ls                      list file items
  menu <n>                show the options of item n
  opt <n> <option>        click an option (delete, rename, duplicate, switchboard-link)
  open <n>                open item n
  rename <n> <name>       submit the inline rename of item n
  cancel <n>              cancel the inline rename of item n
  settings                open the settings modal
  select <id,...>         select enabled document types
  save | close            save or close the settings modal
  clear-storage           clear local storage (asks for confirmation)
  yes | no                answer the open modal
  lang <locale>           switch language
  help | quit";

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Drives,
    Use(String),
    List,
    Menu(usize),
    Option { item: usize, option: String },
    Open(usize),
    Rename { item: usize, name: String },
    Cancel(usize),
    Settings,
    Select(Vec<String>),
    Save,
    Close,
    ClearStorage,
    Yes,
    No,
    Language(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Invalid item number: {0}")]
    BadIndex(String),
}

fn index(arg: Option<&str>) -> Result<usize, ParseError> {
    let arg = arg.ok_or(ParseError::Missing("item number"))?;
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::BadIndex(arg.to_string())),
    }
}

/// Split `"<first> <rest...>"`, keeping inner whitespace of the rest
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

impl FromStr for ShellCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_word(line);
        let non_empty = |what: &'static str| {
            if rest.is_empty() {
                Err(ParseError::Missing(what))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Err(ParseError::Empty),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "drives" => Self::Drives,
            "use" => Self::Use(non_empty("drive id")?),
            "ls" | "list" => Self::List,
            "menu" => Self::Menu(index(Some(rest).filter(|r| !r.is_empty()))?),
            "open" => Self::Open(index(Some(rest).filter(|r| !r.is_empty()))?),
            "cancel" => Self::Cancel(index(Some(rest).filter(|r| !r.is_empty()))?),
            "opt" => {
                let (item, option) = split_word(rest);
                let item = index(Some(item).filter(|i| !i.is_empty()))?;
                if option.is_empty() {
                    return Err(ParseError::Missing("option id"));
                }
                Self::Option {
                    item,
                    option: option.to_string(),
                }
            }
            "rename" => {
                let (item, name) = split_word(rest);
                let item = index(Some(item).filter(|i| !i.is_empty()))?;
                if name.is_empty() {
                    return Err(ParseError::Missing("new name"));
                }
                Self::Rename {
                    item,
                    name: name.to_string(),
                }
            }
            "settings" => Self::Settings,
            "select" => Self::Select(
                rest.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            "save" => Self::Save,
            "close" => Self::Close,
            "clear-storage" => Self::ClearStorage,
            "yes" | "y" => Self::Yes,
            "no" | "n" => Self::No,
            "lang" => Self::Language(non_empty("locale")?),
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}
