use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use custreg_application::list_view::{self, CustomerListView, ListBody};
use custreg_application::{
    AppBootstrap, RegistrationUseCase, ReloadOutcome, RepositoryMode, SubmitOutcome,
};
use custreg_core::customer::{CustomerField, FieldErrors};
use custreg_core::notification::Notification;
use custreg_infrastructure::ConfigService;
use custreg_infrastructure::logging::init_logging;
use custreg_infrastructure::paths::CustregPaths;

mod command;

use command::{COMMANDS, ShellCommand};

#[derive(Parser)]
#[command(name = "custreg-shell")]
#[command(about = "Interactive customer registration shell", long_about = None)]
struct Args {
    /// Config file to use instead of ~/.config/custreg/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a process-local table instead of Supabase
    #[arg(long)]
    offline: bool,
}

/// Completion and hints for slash commands and field names.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
    fields: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            fields: CustomerField::ALL
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
        }
    }

    fn candidates<'a>(&'a self, line: &str) -> (usize, Vec<&'a String>) {
        if let Some(rest) = line.strip_prefix("/set ") {
            if rest.contains(' ') {
                return (0, vec![]);
            }
            let start = line.len() - rest.len();
            let matches = self.fields.iter().filter(|f| f.starts_with(rest)).collect();
            (start, matches)
        } else if line.starts_with('/') && !line.contains(' ') {
            (0, self.commands.iter().filter(|c| c.starts_with(line)).collect())
        } else {
            (0, vec![])
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|m| Pair {
                display: m.clone(),
                replacement: m.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        let (start, matches) = self.candidates(line);
        let typed = line.len() - start;
        matches
            .into_iter()
            .find(|m| m.len() > typed)
            .map(|m| m[typed..].to_string())
    }
}

impl Validator for CliHelper {}

/// Messages in `current` that were not already shown for the same field.
fn new_messages<'a>(
    shown: &FieldErrors,
    current: &'a FieldErrors,
) -> Vec<(CustomerField, &'a str)> {
    current
        .iter()
        .filter(|(field, message)| shown.get(*field) != Some(*message))
        .collect()
}

fn print_notification(notification: &Notification) {
    let line = format!("{}: {}", notification.title, notification.description);
    if notification.is_destructive() {
        println!("{}", line.red());
    } else {
        println!("{}", line.bright_green());
    }
}

fn print_form(registration: &RegistrationUseCase) {
    let form = registration.form();
    let errors = registration.errors();

    for (field, value) in form.entries() {
        let marker = if field.is_required() { "*" } else { " " };
        let shown = if value.is_empty() {
            field.placeholder().bright_black().to_string()
        } else {
            value.to_string()
        };
        println!("{marker} {:<22} {shown}", field.label());
        if let Some(message) = errors.get(field) {
            println!("  {}", message.red());
        }
    }
}

fn print_list(view: &CustomerListView) {
    println!("{}", list_view::TITLE.bright_magenta().bold());
    println!("{}", view.summary.bright_black());
    match view.body {
        ListBody::Loading => println!("{}", list_view::LOADING.yellow()),
        ListBody::Empty => {
            println!("{}", list_view::EMPTY);
            println!("{}", list_view::EMPTY_HINT.bright_black());
        }
        ListBody::Rows(_) => println!("{}", view.render_body()),
    }
    println!();
}

fn print_help() {
    for (usage, description) in command::help() {
        println!("  {:<22} {}", usage.bright_cyan(), description.bright_black());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let service = match args.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = service.get_config()?;
    let log_dir = CustregPaths::logs_dir().ok();
    let _log_guard = init_logging(&config.logging, log_dir.as_deref());

    let mode = if args.offline {
        RepositoryMode::Offline
    } else if !config.supabase.is_configured() {
        println!(
            "{}",
            format!(
                "Supabase is not configured ({}); using an offline table.",
                service.path().display()
            )
            .yellow()
        );
        RepositoryMode::Offline
    } else {
        RepositoryMode::Remote
    };

    let mut app = AppBootstrap::new(&config, mode)?;
    let registration = Arc::clone(&app.registration);
    let loader = app.list_loader.clone();

    // ===== Background printers =====
    // Prints the list each time a reload replaces it, and failures of reloads.
    let mut snapshots = loader.subscribe();
    let list_printer = tokio::spawn(async move {
        let mut shown_version = 0;
        let mut shown_error: Option<String> = None;
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            if snapshot.loading {
                continue;
            }
            if snapshot.version != shown_version {
                shown_version = snapshot.version;
                println!();
                print_list(&CustomerListView::from_snapshot(&snapshot));
            }
            if snapshot.last_error != shown_error {
                if let Some(message) = &snapshot.last_error {
                    println!("{}", format!("Could not load customers: {message}").red());
                }
                shown_error = snapshot.last_error;
            }
        }
    });

    // Inline validation messages as fields are edited.
    let mut field_errors = registration.subscribe_errors();
    tokio::spawn(async move {
        let mut shown = FieldErrors::new();
        while field_errors.changed().await.is_ok() {
            let errors = field_errors.borrow_and_update().clone();
            for (field, message) in new_messages(&shown, &errors) {
                println!("{}", format!("  {}: {}", field.label(), message).red());
            }
            shown = errors;
        }
    });

    tracing::info!(?mode, "Shell started");
    let _ = app.mount_list();

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Customer Registration ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/set <field> <value>' to fill the form, '/submit' to register, '/help' for more, or 'quit' to exit."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let cmd = match command::parse(trimmed) {
                    Ok(cmd) => cmd,
                    Err(message) => {
                        println!("{}", message.bright_black());
                        continue;
                    }
                };

                match cmd {
                    ShellCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ShellCommand::Set { field, value } => {
                        registration.set_field(field, value);
                    }
                    ShellCommand::Form => print_form(&registration),
                    ShellCommand::Help => print_help(),
                    ShellCommand::List => {
                        print_list(&CustomerListView::from_snapshot(&loader.snapshot()));
                    }
                    ShellCommand::Submit => {
                        if registration.is_submitting() {
                            println!("{}", "Registering...".yellow());
                            continue;
                        }
                        let registration = Arc::clone(&registration);
                        tokio::spawn(async move {
                            match registration.submit().await {
                                SubmitOutcome::Registered { notification, .. }
                                | SubmitOutcome::Failed(notification) => {
                                    print_notification(&notification)
                                }
                                SubmitOutcome::Invalid(errors) => {
                                    println!(
                                        "{}",
                                        format!("{} field(s) need attention; see /form", errors.len())
                                            .yellow()
                                    );
                                }
                                SubmitOutcome::Busy => println!("{}", "Registering...".yellow()),
                            }
                        });
                    }
                    ShellCommand::Reload => {
                        let loader = loader.clone();
                        tokio::spawn(async move {
                            if loader.reload_now().await == ReloadOutcome::Busy {
                                println!("{}", list_view::LOADING.yellow());
                            }
                        });
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    app.list_loader.unmount();
    list_printer.abort();

    Ok(())
}
