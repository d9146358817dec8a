use crate::chat::{self, ChatArgs};
use crate::export::{self, ExportArgs};
use crate::server;
use agency_site::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Agency Site",
    about = "Serve the marketing site backend and work with its lead data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through the lead-qualification chat in the terminal
    Chat(ChatArgs),
    /// Print stored form submissions as JSON
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Chat(args) => chat::run(args).await,
        Command::Export(args) => export::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportKind;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["agency-site-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn export_kind_uses_kebab_case() {
        let cli = Cli::try_parse_from(["agency-site-api", "export", "lead-magnets"])
            .expect("parses");
        match cli.command {
            Some(Command::Export(args)) => assert_eq!(args.kind, ExportKind::LeadMagnets),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["agency-site-api", "serve", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
