use crate::demo::{run_demo, run_recommend, DemoArgs, RecommendArgs};
use crate::server;
use admit_advisor::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "admit-advisor",
    about = "Estimate admission probabilities and build rush / stable / safe application lists",
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
    /// Produce tiered recommendations for one student from CSV catalogs
    Recommend(RecommendArgs),
    /// Run the recommendation pipeline against the built-in sample catalog
    Demo(DemoArgs),
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
        Command::Recommend(args) => run_recommend(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommend_arguments_parse() {
        let cli = Cli::try_parse_from([
            "admit-advisor",
            "recommend",
            "--score",
            "612",
            "--province",
            "Zhejiang",
            "--subject",
            "Physics",
            "--year",
            "2025",
            "--major",
            "Computer",
            "--major",
            "Software",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Recommend(args)) => {
                assert_eq!(args.score, 612);
                assert_eq!(args.rank, None);
                assert_eq!(args.majors, vec!["Computer", "Software"]);
                assert!(args.json);
                assert!(args.inventory.is_none());
            }
            other => panic!("expected recommend command, got {other:?}"),
        }
    }

    #[test]
    fn catalog_paths_must_come_in_pairs() {
        let parsed = Cli::try_parse_from([
            "admit-advisor",
            "recommend",
            "--inventory",
            "inventory.csv",
            "--score",
            "612",
            "--province",
            "Zhejiang",
            "--subject",
            "Physics",
            "--year",
            "2025",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["admit-advisor"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
