use agency_site::config::AppConfig;
use agency_site::error::AppError;
use agency_site::submissions::{SqliteStore, SubmissionRepository};
use clap::{Args, ValueEnum};

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Which form's submissions to print
    #[arg(value_enum)]
    pub(crate) kind: ExportKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportKind {
    Contacts,
    LeadMagnets,
}

/// Reads straight from the store, so it works even when the listing routes are disabled.
pub(crate) fn run(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = SqliteStore::connect(&config.database)?;
    println!("{}", render(args.kind, &store)?);
    Ok(())
}

fn render<R: SubmissionRepository>(kind: ExportKind, repository: &R) -> Result<String, AppError> {
    let rendered = match kind {
        ExportKind::Contacts => {
            serde_json::to_string_pretty(&repository.list_contact_submissions()?)?
        }
        ExportKind::LeadMagnets => {
            serde_json::to_string_pretty(&repository.list_lead_magnet_submissions()?)?
        }
    };
    Ok(rendered)
}
