//! Parsing of shell input lines.

use custreg_core::customer::CustomerField;

pub const COMMANDS: [&str; 6] = ["/set", "/form", "/submit", "/list", "/reload", "/help"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// `/set <field> [value]`; a missing value clears the field.
    Set { field: CustomerField, value: String },
    Form,
    Submit,
    List,
    Reload,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "quit" | "exit" => Ok(ShellCommand::Quit),
        "/form" => Ok(ShellCommand::Form),
        "/submit" => Ok(ShellCommand::Submit),
        "/list" => Ok(ShellCommand::List),
        "/reload" => Ok(ShellCommand::Reload),
        "/help" => Ok(ShellCommand::Help),
        "/set" => {
            if rest.is_empty() {
                return Err("Usage: /set <field> [value]".to_string());
            }
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (rest, ""),
            };
            let field = name.parse::<CustomerField>().map_err(|e| e.to_string())?;
            Ok(ShellCommand::Set {
                field,
                value: value.to_string(),
            })
        }
        _ => Err(format!("Unknown command: {head}. Type /help for commands.")),
    }
}

pub fn help() -> Vec<(&'static str, &'static str)> {
    vec![
        ("/set <field> [value]", "Set a form field; omit the value to clear it"),
        ("/form", "Show the form with validation messages"),
        ("/submit", "Register the customer"),
        ("/list", "Show registered customers"),
        ("/reload", "Reload the customer list"),
        ("/help", "Show this help"),
        ("quit", "Exit"),
    ]
}
