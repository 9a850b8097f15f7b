use crate::demo::{
    run_demo, run_recommend, run_route, run_survey_questions, run_survey_score, DemoArgs,
    RecommendArgs, RouteArgs, SurveyScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use daetrip::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "DaeTRIP",
    about = "Score the DaeTRIP traveler survey, recommend Daejeon sites, and serve the recommendation API",
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
    /// Inspect or score the traveler survey
    Survey {
        #[command(subcommand)]
        command: SurveyCommand,
    },
    /// Score answers and print the recommended itinerary
    Recommend(RecommendArgs),
    /// Build an itinerary through hand-picked sites
    Route(RouteArgs),
    /// Run an end-to-end demo including the advisor conversation
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SurveyCommand {
    /// List the survey questions and traveler types
    Questions,
    /// Score a set of answers
    Score(SurveyScoreArgs),
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
        Command::Survey {
            command: SurveyCommand::Questions,
        } => run_survey_questions(),
        Command::Survey {
            command: SurveyCommand::Score(args),
        } => run_survey_score(args),
        Command::Recommend(args) => run_recommend(args),
        Command::Route(args) => run_route(args),
        Command::Demo(args) => run_demo(args),
    }
}
