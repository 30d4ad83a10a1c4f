//! Command-line front end for the StudyNote core.
//!
//! # Responsibility
//! - Wire configuration, logging and the SQLite preference store.
//! - Expose subject/note operations as sub-commands for local use.
//!
//! Exit code is `0` on success, `1` on runtime failure and `2` on usage
//! errors (reported by clap).

use clap::{Parser, Subcommand};
use log::error;
use std::process::ExitCode;
use studynote_core::db::open_db;
use studynote_core::{
    init_logging_from_config, CoreConfig, Note, SqlitePreferenceStore, Subject, SubjectDraft,
    SubjectService, SubjectStyle, QUICK_ADD_ICON,
};

const DEFAULT_GRADIENT: &str = "from-purple-500 to-pink-500";
const DEFAULT_SHADOW: &str = "shadow-purple-500/50";

#[derive(Parser, Debug)]
#[command(name = "studynote", version, about = "Manage study subjects and their notes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print core health and version
    Ping,
    /// List subjects with note counts
    Subjects,
    /// Add a subject from a name alone, with the default icon and style
    QuickAdd { name: String },
    /// Add a subject with every field
    AddSubject {
        name: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long, default_value = DEFAULT_GRADIENT)]
        gradient: String,
        #[arg(long, default_value = DEFAULT_SHADOW)]
        shadow: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change fields of a subject; omitted fields keep their value
    EditSubject {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        gradient: Option<String>,
        #[arg(long)]
        shadow: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a subject and its notes
    DeleteSubject { id: i64 },
    /// List notes of a subject, newest first
    Notes { subject_id: i64 },
    /// Add a note to a subject
    AddNote { subject_id: i64, content: String },
    /// Remove one note of a subject
    RemoveNote { subject_id: i64, note_id: i64 },
    /// Delete every note of a subject
    ClearNotes { subject_id: i64 },
    /// Delete notes left behind by deleted subjects
    PurgeOrphans,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_command module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    if command == Command::Ping {
        println!("studynote_core ping={}", studynote_core::ping());
        println!("studynote_core version={}", studynote_core::core_version());
        return Ok(());
    }

    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }
    let conn = open_db(config.db_path()).map_err(|err| err.to_string())?;
    let kv = SqlitePreferenceStore::try_new(&conn).map_err(|err| err.to_string())?;
    let service = SubjectService::new(&kv);

    match command {
        Command::Ping => {}
        Command::Subjects => {
            let counts = service.note_counts();
            for subject in service.list_subjects() {
                let count = counts.get(&subject.id).copied().unwrap_or(0);
                println!("{}", subject_line(&subject, count));
            }
            let overview = service.overview();
            println!(
                "{} subjects, {} notes, {} notes/subject on average",
                overview.subject_count, overview.total_notes, overview.average_notes_per_subject
            );
        }
        Command::QuickAdd { name } => {
            let style = SubjectStyle::new(DEFAULT_GRADIENT, DEFAULT_SHADOW);
            let subject = service
                .quick_add_subject(&name, style)
                .map_err(|err| err.to_string())?;
            println!("{}", subject_line(&subject, 0));
        }
        Command::AddSubject {
            name,
            icon,
            gradient,
            shadow,
            description,
        } => {
            let draft = SubjectDraft {
                name,
                icon: icon.unwrap_or_else(|| QUICK_ADD_ICON.to_string()),
                gradient,
                shadow,
                description,
            };
            let subject = service.add_subject(draft).map_err(|err| err.to_string())?;
            println!("{}", subject_line(&subject, 0));
        }
        Command::EditSubject {
            id,
            name,
            icon,
            gradient,
            shadow,
            description,
        } => {
            let current = require_subject(&service, id)?;
            let draft = SubjectDraft {
                name: name.unwrap_or(current.name),
                icon: icon.unwrap_or(current.icon),
                gradient: gradient.unwrap_or(current.gradient),
                shadow: shadow.unwrap_or(current.shadow),
                description: description.unwrap_or(current.description),
            };
            let subject = service
                .edit_subject(id, draft)
                .map_err(|err| err.to_string())?;
            println!("{}", subject_line(&subject, service.notes().count(id)));
        }
        Command::DeleteSubject { id } => {
            service.delete_subject(id).map_err(|err| err.to_string())?;
            println!("deleted subject {id}");
        }
        Command::Notes { subject_id } => {
            require_subject(&service, subject_id)?;
            print_notes(&service.notes().load(subject_id));
        }
        Command::AddNote {
            subject_id,
            content,
        } => {
            require_subject(&service, subject_id)?;
            print_notes(&service.notes().append(subject_id, &content));
        }
        Command::RemoveNote {
            subject_id,
            note_id,
        } => {
            require_subject(&service, subject_id)?;
            print_notes(&service.notes().remove(subject_id, note_id));
        }
        Command::ClearNotes { subject_id } => {
            require_subject(&service, subject_id)?;
            service.notes().clear(subject_id);
            println!("cleared notes of subject {subject_id}");
        }
        Command::PurgeOrphans => {
            let removed = service
                .purge_orphaned_notes()
                .map_err(|err| err.to_string())?;
            println!("removed {removed} orphaned note collections");
        }
    }
    Ok(())
}

fn require_subject(
    service: &SubjectService<'_, SqlitePreferenceStore<'_>>,
    subject_id: i64,
) -> Result<Subject, String> {
    service
        .get_subject(subject_id)
        .ok_or_else(|| format!("subject not found: {subject_id}"))
}

fn subject_line(subject: &Subject, note_count: usize) -> String {
    format!(
        "{:>14}  {} {}  ({} notes){}",
        subject.id,
        subject.icon,
        subject.name,
        note_count,
        if subject.description.is_empty() {
            String::new()
        } else {
            format!("  {}", subject.description)
        }
    )
}

fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("(no notes)");
        return;
    }
    for note in notes {
        println!("[{}] {}", note.id, note.timestamp);
        for line in note.content.lines() {
            println!("    {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, DEFAULT_GRADIENT};
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("studynote").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_note_commands() {
        assert_eq!(
            parse(&["add-note", "17", "ôn tập"]).unwrap(),
            Command::AddNote {
                subject_id: 17,
                content: "ôn tập".to_string(),
            }
        );
        assert_eq!(
            parse(&["remove-note", "17", "42"]).unwrap(),
            Command::RemoveNote {
                subject_id: 17,
                note_id: 42,
            }
        );
    }

    #[test]
    fn add_subject_fills_defaults_for_omitted_flags() {
        match parse(&["add-subject", "Sử", "--description", "Lịch sử"]).unwrap() {
            Command::AddSubject {
                name,
                icon,
                gradient,
                description,
                ..
            } => {
                assert_eq!(name, "Sử");
                assert_eq!(icon, None);
                assert_eq!(gradient, DEFAULT_GRADIENT);
                assert_eq!(description, "Lịch sử");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn edit_subject_keeps_unset_fields_empty() {
        match parse(&["edit-subject", "3", "--icon", "🧪"]).unwrap() {
            Command::EditSubject {
                id,
                name,
                icon,
                description,
                ..
            } => {
                assert_eq!(id, 3);
                assert_eq!(name, None);
                assert_eq!(icon.as_deref(), Some("🧪"));
                assert_eq!(description, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_ids_and_unknown_commands() {
        assert_eq!(
            parse(&["notes", "abc"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&["frobnicate"]).unwrap_err().kind(),
            ErrorKind::InvalidSubcommand
        );
        assert!(parse(&[]).is_err());
        assert!(parse(&["subjects", "extra"]).is_err());
    }
}
