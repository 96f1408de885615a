use std::path::PathBuf;

/// One line of input to the interactive front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Import(PathBuf),
    Export(Option<PathBuf>),
    Search(String),
    Sort(String),
    /// Zero-based page index; the user types pages starting at 1.
    Page(usize),
    Next,
    Prev,
    Edit(String),
    Set { key: String, value: String },
    Save,
    Cancel,
    Delete(String),
    Columns,
    Toggle(String),
    AddColumn { key: String, label: String },
    MoveColumn { from: usize, to: usize },
    SaveAll,
    CancelAll,
    Help,
    Quit,
}

pub const HELP: &str = "Commands:
  import <path>            Append rows from a CSV file
  export [path]            Write the current view as CSV
  search [text]            Filter rows (empty clears)
  sort <key>               Cycle sort on a column: asc, desc, off
  page <n> | next | prev   Move between pages
  edit <id>                Start editing a row
  set <key> <value>        Change a field of the row being edited
  save | cancel            Commit or discard the edit
  delete <id>              Remove a row
  columns                  List columns with their positions
  toggle <key>             Show or hide a column
  addcol <key> <label>     Add a column
  movecol <from> <to>      Move a column (positions from `columns`)
  saveall | cancelall      Save everything / reset the view
  q                        Quit";

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let cmd = match word.to_ascii_lowercase().as_str() {
            "" => return Err("empty command".to_string()),
            "import" => Command::Import(PathBuf::from(required(rest, "path")?)),
            "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "search" => Command::Search(rest.to_string()),
            "sort" => Command::Sort(single(rest, "column key")?),
            "page" => {
                let n = number(rest, "page")?;
                if n == 0 {
                    return Err("pages start at 1".to_string());
                }
                Command::Page(n - 1)
            }
            "next" => Command::Next,
            "prev" => Command::Prev,
            "edit" => Command::Edit(single(rest, "row id")?),
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(k, v)| (k, v.trim()))
                    .unwrap_or((rest, ""));
                Command::Set {
                    key: required(key, "field key")?.to_string(),
                    value: value.to_string(),
                }
            }
            "save" => Command::Save,
            "cancel" => Command::Cancel,
            "delete" => Command::Delete(single(rest, "row id")?),
            "columns" => Command::Columns,
            "toggle" => Command::Toggle(single(rest, "column key")?),
            "addcol" => {
                let (key, label) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: addcol <key> <label>".to_string())?;
                Command::AddColumn {
                    key: key.to_string(),
                    label: label.trim().to_string(),
                }
            }
            "movecol" => {
                let mut parts = rest.split_whitespace();
                let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
                    return Err("usage: movecol <from> <to>".to_string());
                };
                Command::MoveColumn {
                    from: number(from, "from")?,
                    to: number(to, "to")?,
                }
            }
            "saveall" => Command::SaveAll,
            "cancelall" => Command::CancelAll,
            "help" => Command::Help,
            "q" | "quit" => Command::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };
        Ok(cmd)
    }
}

fn required<'a>(arg: &'a str, what: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("missing {}", what))
    } else {
        Ok(arg)
    }
}

fn single(arg: &str, what: &str) -> Result<String, String> {
    let arg = required(arg, what)?;
    if arg.contains(char::is_whitespace) {
        return Err(format!("expected a single {}", what));
    }
    Ok(arg.to_string())
}

fn number(arg: &str, what: &str) -> Result<usize, String> {
    required(arg, what)?
        .parse()
        .map_err(|_| format!("{} must be a whole number", what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!(Command::parse("next"), Ok(Command::Next));
        assert_eq!(Command::parse("  Q "), Ok(Command::Quit));
        assert_eq!(Command::parse("sort age"), Ok(Command::Sort("age".into())));
        assert_eq!(Command::parse("search"), Ok(Command::Search(String::new())));
        assert_eq!(
            Command::parse("search grace hopper"),
            Ok(Command::Search("grace hopper".into()))
        );
    }

    #[test]
    fn pages_are_one_based_for_the_user() {
        assert_eq!(Command::parse("page 1"), Ok(Command::Page(0)));
        assert!(Command::parse("page 0").is_err());
        assert!(Command::parse("page two").is_err());
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            Command::parse("set role team lead"),
            Ok(Command::Set {
                key: "role".into(),
                value: "team lead".into()
            })
        );
        assert_eq!(
            Command::parse("set age"),
            Ok(Command::Set {
                key: "age".into(),
                value: String::new()
            })
        );
        assert!(Command::parse("set").is_err());
    }

    #[test]
    fn column_commands() {
        assert_eq!(
            Command::parse("addcol dept Department Name"),
            Ok(Command::AddColumn {
                key: "dept".into(),
                label: "Department Name".into()
            })
        );
        assert_eq!(
            Command::parse("movecol 3 0"),
            Ok(Command::MoveColumn { from: 3, to: 0 })
        );
        assert!(Command::parse("movecol 3").is_err());
        assert!(Command::parse("addcol dept").is_err());
    }

    #[test]
    fn export_path_is_optional() {
        assert_eq!(Command::parse("export"), Ok(Command::Export(None)));
        assert_eq!(
            Command::parse("export out.csv"),
            Ok(Command::Export(Some(PathBuf::from("out.csv"))))
        );
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("edit").is_err());
        assert!(Command::parse("delete a b").is_err());
    }
}
