//! Interactive shell mode for HackHere CLI
//!
//! Drives a single selection controller through the same operations the
//! map view uses, with command history and tab completion.

use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};
use std::sync::Arc;

use super::commands::{events, states};
use crate::catalog::{results_label, Catalog};
use crate::regions::StateCode;
use crate::state::SelectionController;

/// Command completer for the shell
struct ShellCompleter {
    commands: Vec<&'static str>,
    /// Codes offered after `state` and `pick`
    state_codes: Vec<String>,
}

impl ShellCompleter {
    fn new(catalog: &Catalog) -> Self {
        Self {
            commands: vec![
                "search", "state", "pick", "clear", "open", "close", "list", "show", "states", "help",
                "exit", "quit",
            ],
            state_codes: catalog
                .states_with_events()
                .into_iter()
                .map(|code| code.as_str().to_string())
                .collect(),
        }
    }

    fn pairs<'a>(items: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<Pair> {
        let prefix = prefix.to_uppercase();
        items
            .filter(|item| item.to_uppercase().starts_with(&prefix))
            .map(|item| Pair {
                display: item.to_string(),
                replacement: item.to_string(),
            })
            .collect()
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let words: Vec<&str> = line.split_whitespace().collect();
        let start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);

        match (words.as_slice(), line.ends_with(' ')) {
            ([], _) => Ok((0, Self::pairs(self.commands.iter().copied(), ""))),
            ([prefix], false) => Ok((start, Self::pairs(self.commands.iter().copied(), prefix))),
            ([cmd], true) if matches!(*cmd, "state" | "pick") => {
                Ok((pos, Self::pairs(self.state_codes.iter().map(String::as_str), "")))
            }
            ([cmd, prefix], false) if matches!(*cmd, "state" | "pick") => {
                Ok((start, Self::pairs(self.state_codes.iter().map(String::as_str), prefix)))
            }
            _ => Ok((pos, vec![])),
        }
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}
impl Helper for ShellCompleter {}

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    /// `search [TEXT]`: replace the search term (no text clears it)
    Search(String),
    /// `state [UF]`: map-click toggle (no code clears the filter)
    State(Option<StateCode>),
    /// `pick [UF]`: dropdown selection (no code means all states)
    Pick(Option<StateCode>),
    Clear,
    Open(usize),
    Close,
    List,
    Show,
    States,
    Help,
    Exit,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let command = match cmd {
            "search" => Self::Search(unquote(rest).to_string()),
            "state" => Self::State(StateCode::parse(rest)),
            "pick" => Self::Pick(StateCode::parse(rest)),
            "clear" => Self::Clear,
            "open" => {
                let index = rest
                    .parse()
                    .map_err(|_| format!("'open' needs a list index, got '{}'", rest))?;
                Self::Open(index)
            }
            "close" => Self::Close,
            "list" | "ls" => Self::List,
            "show" => Self::Show,
            "states" => Self::States,
            "help" | "?" => Self::Help,
            "exit" | "quit" => Self::Exit,
            other => return Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
        };
        Ok(command)
    }
}

/// Strip one pair of matching surrounding quotes
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner;
        }
    }
    text
}

/// Shell session state
struct Shell {
    controller: SelectionController,
}

impl Shell {
    fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            controller: SelectionController::new(catalog),
        }
    }

    fn prompt(&self) -> String {
        match self.controller.selected_state() {
            Some(code) => format!("hackhere[{}]> ", code),
            None => "hackhere> ".to_string(),
        }
    }

    /// One-line summary of the current filters
    fn status(&self) -> String {
        let mut parts = Vec::new();
        if !self.controller.search_term().is_empty() {
            parts.push(format!("busca: \"{}\"", self.controller.search_term()));
        }
        if let Some(code) = self.controller.selected_state() {
            parts.push(format!("Filtrado por: {}", code.display_name()));
        }
        parts.push(results_label(self.controller.filtered_events().len()));
        format!("[{}]", parts.join(" | "))
    }

    /// Apply a command; returns the text to print, or None to exit
    fn execute(&mut self, command: ShellCommand) -> Option<String> {
        let output = match command {
            ShellCommand::Search(term) => {
                self.controller.set_search_term(term);
                self.status()
            }
            ShellCommand::State(code) => {
                self.controller.select_state(code);
                self.status()
            }
            ShellCommand::Pick(code) => {
                let value = code.as_ref().map(StateCode::as_str).unwrap_or("");
                self.controller.select_state_from_dropdown(value);
                self.status()
            }
            ShellCommand::Clear => {
                self.controller.clear_state_filter();
                self.status()
            }
            ShellCommand::Open(index) => {
                self.controller.select_event_by_index(index);
                self.selected_detail()
            }
            ShellCommand::Close => {
                self.controller.close_event_detail();
                "Detalhe fechado".to_string()
            }
            ShellCommand::List => self.list(),
            ShellCommand::Show => self.selected_detail(),
            ShellCommand::States => states::format_rows(&states::rows(self.controller.catalog())),
            ShellCommand::Help => HELP.trim_end().to_string(),
            ShellCommand::Exit => return None,
        };
        Some(output)
    }

    fn list(&self) -> String {
        let rows: Vec<events::EventRow> = self
            .controller
            .filtered_events()
            .into_iter()
            .enumerate()
            .map(|(index, event)| events::EventRow::new(index, event))
            .collect();

        if rows.is_empty() {
            return match self.controller.selected_state() {
                Some(code) => format!("Nenhum evento encontrado em {}", code.display_name()),
                None => "Nenhum evento encontrado".to_string(),
            };
        }
        format!("{}\n{}", events::format_rows(&rows), self.status())
    }

    fn selected_detail(&self) -> String {
        match (self.controller.selected_event(), self.controller.selected_event_index()) {
            (Some(event), _) => events::format_event(event),
            (None, Some(index)) => format!("No event at index {}", index),
            (None, None) => "Nenhum evento selecionado".to_string(),
        }
    }
}

const HELP: &str = r#"HackHere Interactive Shell

Commands:
  search [TEXT]     Filter by event name (no text clears the search)
  state [UF]        Toggle the state filter, like clicking the map
  pick [UF]         Set the state filter, like the dropdown (no UF = all)
  clear             Remove the state filter
  open N            Open event N of the current list
  close             Close the open event
  list, ls          List events matching the filters
  show              Show the open event
  states            List states with events

  help              Show this help
  exit, quit        Exit the shell
"#;

/// Get the history file path
fn history_path() -> Option<std::path::PathBuf> {
    crate::config::project_dirs()
        .ok()
        .map(|dirs| dirs.data_dir().join("shell_history"))
}

/// Run the interactive shell
pub fn run(catalog: Arc<Catalog>) -> Result<()> {
    println!("HackHere Interactive Shell v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(ShellCompleter::new(&catalog)));

    if let Some(path) = history_path() {
        let _ = rl.load_history(&path);
    }

    let mut shell = Shell::new(catalog);
    println!("{}", shell.status());

    loop {
        match rl.readline(&shell.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                match ShellCommand::parse(line) {
                    Ok(command) => match shell.execute(command) {
                        Some(output) => println!("{}", output),
                        None => break,
                    },
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(path) = history_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Shell {
        let json = r#"[
            {"name": "Roadsec", "date": "2025-11", "city": "São Paulo", "state": "SP", "url": "https://roadsec.com.br"},
            {"name": "BSides SP", "date": "2025-05", "city": "São Paulo", "state": "SP", "url": "https://bsidessp.org"},
            {"name": "Hack Rio", "date": "2025-08", "city": "Rio de Janeiro", "state": "RJ", "url": "https://hack.rio"}
        ]"#;
        Shell::new(Arc::new(Catalog::from_json(json).unwrap()))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("search hack rio"), Ok(ShellCommand::Search("hack rio".into())));
        assert_eq!(ShellCommand::parse("search \"Road sec\""), Ok(ShellCommand::Search("Road sec".into())));
        assert_eq!(ShellCommand::parse("search"), Ok(ShellCommand::Search(String::new())));
        assert_eq!(ShellCommand::parse("state sp"), Ok(ShellCommand::State(Some(StateCode::new("SP")))));
        assert_eq!(ShellCommand::parse("state"), Ok(ShellCommand::State(None)));
        assert_eq!(ShellCommand::parse("pick"), Ok(ShellCommand::Pick(None)));
        assert_eq!(ShellCommand::parse("open 2"), Ok(ShellCommand::Open(2)));
        assert_eq!(ShellCommand::parse("quit"), Ok(ShellCommand::Exit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("open two").is_err());
        assert!(ShellCommand::parse("open").is_err());
        assert!(ShellCommand::parse("fly").is_err());
    }

    #[test]
    fn test_state_toggles_and_pick_sets() {
        let mut shell = shell();

        shell.execute(ShellCommand::State(Some(StateCode::new("SP"))));
        assert_eq!(shell.controller.filtered_events().len(), 2);
        shell.execute(ShellCommand::State(Some(StateCode::new("SP"))));
        assert!(shell.controller.selected_state().is_none());

        shell.execute(ShellCommand::Pick(Some(StateCode::new("RJ"))));
        shell.execute(ShellCommand::Pick(Some(StateCode::new("RJ"))));
        assert_eq!(shell.controller.selected_state(), Some(&StateCode::new("RJ")));

        shell.execute(ShellCommand::Pick(None));
        assert!(shell.controller.selected_state().is_none());
    }

    #[test]
    fn test_open_and_close() {
        let mut shell = shell();
        shell.execute(ShellCommand::Search("bsides".into()));

        let output = shell.execute(ShellCommand::Open(0)).unwrap();
        assert!(output.starts_with("BSides SP"));

        let output = shell.execute(ShellCommand::Open(5)).unwrap();
        assert_eq!(output, "No event at index 5");

        shell.execute(ShellCommand::Close);
        assert_eq!(shell.execute(ShellCommand::Show).unwrap(), "Nenhum evento selecionado");
    }

    #[test]
    fn test_status_and_prompt() {
        let mut shell = shell();
        assert_eq!(shell.prompt(), "hackhere> ");
        assert_eq!(shell.status(), "[3 resultados]");

        shell.execute(ShellCommand::State(Some(StateCode::new("RJ"))));
        assert_eq!(shell.prompt(), "hackhere[RJ]> ");
        assert_eq!(shell.status(), "[Filtrado por: Rio de Janeiro | 1 resultado]");
    }

    #[test]
    fn test_list_empty_message() {
        let mut shell = shell();
        shell.execute(ShellCommand::State(Some(StateCode::new("RJ"))));
        shell.execute(ShellCommand::Search("roadsec".into()));
        assert_eq!(shell.list(), "Nenhum evento encontrado em Rio de Janeiro");
    }

    #[test]
    fn test_exit_returns_none() {
        assert!(shell().execute(ShellCommand::Exit).is_none());
    }
}
