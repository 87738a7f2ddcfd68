//! Command handlers. Each writes its human-readable output to `out` so the
//! binary prints to stdout and tests capture a buffer.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use eduhire_client::ApiClient;
use eduhire_core::curriculum::{ContainerId, Curriculum, DragLocation, DropResult};
use eduhire_core::optimistic::{FollowState, Optimistic};
use eduhire_core::wizard::{
    validate_step, DraftStore, FileHandle, FileStorage, InstitutionForm, SubmitOutcome,
    ValidationErrors, WizardController, WizardStep,
};

use crate::args::{Cli, Command, DraftCommand, SectionsCommand};
use crate::config::CliConfig;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli, config: &CliConfig, out: &mut impl Write) -> Result<()> {
    let draft_dir = cli.draft_dir.as_deref().unwrap_or(&config.draft_dir);

    match cli.command {
        Command::Draft { action } => run_draft(action, draft_dir, out),
        Command::Validate { step } => validate(step, draft_dir, out),
        Command::Submit { logo, cover_image } => {
            let client = ApiClient::new(&config.client)?;
            submit(&client, draft_dir, logo.as_deref(), cover_image.as_deref(), out).await
        }
        Command::Follow { slug } => {
            let client = ApiClient::new(&config.client)?;
            follow(&client, &slug, out).await
        }
        Command::Sections { action } => {
            let client = ApiClient::new(&config.client)?;
            run_sections(&client, action, out).await
        }
    }
}

fn open_wizard(draft_dir: &Path) -> Result<WizardController<FileStorage>> {
    let storage = FileStorage::open(draft_dir)
        .with_context(|| format!("opening draft directory {}", draft_dir.display()))?;
    Ok(WizardController::new(DraftStore::new(storage)))
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

pub fn run_draft(action: DraftCommand, draft_dir: &Path, out: &mut impl Write) -> Result<()> {
    match action {
        DraftCommand::Show => {
            let wizard = open_wizard(draft_dir)?;
            if !wizard.drafts().has_draft() {
                writeln!(out, "No saved draft, showing defaults")?;
            }
            writeln!(out, "{}", serde_json::to_string_pretty(wizard.form())?)?;
        }
        DraftCommand::Set { field, value } => {
            if matches!(field.as_str(), "logo" | "cover_image") {
                bail!("'{field}' is a file and is not kept in drafts; pass it to `submit` instead");
            }
            let mut wizard = open_wizard(draft_dir)?;
            wizard.update_field(&field, value.into())?;
            writeln!(out, "Saved {field}")?;
        }
        DraftCommand::Clear => {
            let mut drafts = DraftStore::new(FileStorage::open(draft_dir)?);
            drafts.clear()?;
            writeln!(out, "Draft cleared")?;
        }
        DraftCommand::Fields => {
            for name in InstitutionForm::field_names() {
                writeln!(out, "{name}")?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validate / submit
// ---------------------------------------------------------------------------

/// Validate one step, or the review step (every field) when `step` is
/// `None`. Fails when any field is invalid.
pub fn validate(step: Option<u8>, draft_dir: &Path, out: &mut impl Write) -> Result<()> {
    let step = match step {
        Some(n) => WizardStep::from_number(n)?,
        None => WizardStep::Review,
    };
    let wizard = open_wizard(draft_dir)?;
    let errors = validate_step(step, wizard.form());
    if errors.is_empty() {
        writeln!(out, "Step {} ({}) is valid", step.to_number(), step.label())?;
        return Ok(());
    }
    write_errors(&errors, out)?;
    bail!(
        "step {} ({}) has {} invalid field(s)",
        step.to_number(),
        step.label(),
        errors.len()
    )
}

pub async fn submit(
    client: &ApiClient,
    draft_dir: &Path,
    logo: Option<&Path>,
    cover_image: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let mut wizard = open_wizard(draft_dir)?;
    for (field, path) in [("logo", logo), ("cover_image", cover_image)] {
        if let Some(path) = path {
            let file = FileHandle::from_path(path)
                .with_context(|| format!("reading {}", path.display()))?;
            wizard.update_field(field, file.into())?;
        }
    }

    match wizard.submit(client).await {
        SubmitOutcome::Created(created) => {
            match (&created.slug, created.id) {
                (Some(slug), Some(id)) => {
                    writeln!(out, "Institution created: {} ({slug}, {id})", created.name)?
                }
                (Some(slug), None) => writeln!(out, "Institution created: {} ({slug})", created.name)?,
                _ => writeln!(out, "Institution created: {}", created.name)?,
            }
            Ok(())
        }
        SubmitOutcome::Invalid => {
            write_errors(wizard.errors(), out)?;
            bail!("draft is incomplete, nothing was sent")
        }
        SubmitOutcome::Failed { message } => bail!("submission failed: {message}"),
    }
}

/// Toggle follow starting from the server's current state. The
/// speculative state is shown first and replaced by the confirmed one.
pub async fn follow(client: &ApiClient, slug: &str, out: &mut impl Write) -> Result<()> {
    let mut state = Optimistic::new(client.follow_state(slug).await?);
    let expected = state.get().toggled();
    writeln!(out, "{}...", follow_line(slug, &expected))?;

    client.toggle_follow_optimistic(slug, &mut state).await?;
    writeln!(out, "{}", follow_line(slug, state.get()))?;
    Ok(())
}

fn follow_line(slug: &str, state: &FollowState) -> String {
    let verb = if state.is_following { "Following" } else { "Not following" };
    format!("{verb} {slug} ({} followers)", state.follower_count)
}

fn write_errors(errors: &ValidationErrors, out: &mut impl Write) -> Result<()> {
    for (field, message) in errors.iter() {
        writeln!(out, "  {field}: {message}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

async fn run_sections(
    client: &ApiClient,
    action: SectionsCommand,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        SectionsCommand::List { course_id } => {
            let curriculum = client.list_sections(course_id).await?;
            write_curriculum(&curriculum, out)?;
        }
        SectionsCommand::Add { course_id, title } => {
            let created = client.create_section(course_id, &title).await?;
            writeln!(out, "Section {} created at position {}", created.id, created.order)?;
        }
        SectionsCommand::Move {
            course_id,
            from,
            from_index,
            to,
            to_index,
        } => {
            let drop = DropResult {
                source: DragLocation::new(ContainerId::parse(&from)?, from_index),
                destination: Some(DragLocation::new(ContainerId::parse(&to)?, to_index)),
            };
            move_item(client, course_id, &drop, out).await?;
        }
    }
    Ok(())
}

async fn move_item(
    client: &ApiClient,
    course_id: Uuid,
    drop: &DropResult,
    out: &mut impl Write,
) -> Result<()> {
    let mut curriculum = client.list_sections(course_id).await?;
    curriculum.apply_drop(drop)?;
    client.persist_drop(course_id, &curriculum, drop).await?;
    write_curriculum(&curriculum, out)?;
    Ok(())
}

pub fn write_curriculum(curriculum: &Curriculum, out: &mut impl Write) -> Result<()> {
    if curriculum.sections().is_empty() {
        writeln!(out, "No sections")?;
        return Ok(());
    }
    for section in curriculum.sections() {
        writeln!(
            out,
            "{}. {} [{}] ({} min)",
            section.order + 1,
            section.title,
            section.id,
            section.total_duration_minutes()
        )?;
        for lesson in &section.lessons {
            let preview = if lesson.is_preview { ", preview" } else { "" };
            writeln!(
                out,
                "   {}.{} {} [{}] {} {} min{preview}",
                section.order + 1,
                lesson.order + 1,
                lesson.title,
                lesson.id,
                lesson.content_type.as_str(),
                lesson.duration_minutes
            )?;
        }
    }
    Ok(())
}
