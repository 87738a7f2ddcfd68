use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "eduhire")]
#[command(about = "Institution onboarding and course curriculum tools for eduhire")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override `DRAFT_DIR`.
    #[arg(long, global = true)]
    pub draft_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or edit the saved institution draft
    Draft {
        #[command(subcommand)]
        action: DraftCommand,
    },
    /// Validate the draft for one step, or every step when omitted
    Validate {
        #[arg(long)]
        step: Option<u8>,
    },
    /// Submit the draft as a new institution
    Submit {
        /// Logo image to upload
        #[arg(long)]
        logo: Option<PathBuf>,
        /// Cover image to upload
        #[arg(long)]
        cover_image: Option<PathBuf>,
    },
    /// Toggle following an institution
    Follow { slug: String },
    /// Manage a course's sections and lessons
    Sections {
        #[command(subcommand)]
        action: SectionsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Print the saved draft
    Show,
    /// Set a single field and save the draft
    Set { field: String, value: String },
    /// Delete the saved draft
    Clear,
    /// List every settable field name
    Fields,
}

#[derive(Debug, Subcommand)]
pub enum SectionsCommand {
    /// Print a course's sections and lessons
    List { course_id: Uuid },
    /// Append a section to a course
    Add { course_id: Uuid, title: String },
    /// Move a section or lesson and save the new order
    Move {
        course_id: Uuid,
        /// Source list: `sections` or `section-<id>`
        #[arg(long)]
        from: String,
        #[arg(long)]
        from_index: usize,
        /// Destination list: `sections` or `section-<id>`
        #[arg(long)]
        to: String,
        #[arg(long)]
        to_index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_draft_set() {
        let cli = Cli::parse_from(["eduhire", "draft", "set", "city", "Pune"]);
        match cli.command {
            Command::Draft {
                action: DraftCommand::Set { field, value },
            } => {
                assert_eq!(field, "city");
                assert_eq!(value, "Pune");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_move() {
        let cli = Cli::parse_from([
            "eduhire",
            "sections",
            "move",
            "00000000-0000-0000-0000-000000000000",
            "--from",
            "sections",
            "--from-index",
            "2",
            "--to",
            "sections",
            "--to-index",
            "0",
        ]);
        assert!(matches!(
            cli.command,
            Command::Sections {
                action: SectionsCommand::Move {
                    from_index: 2,
                    to_index: 0,
                    ..
                }
            }
        ));
    }
}
