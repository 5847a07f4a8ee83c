use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{EmbedderKind, PlannerConfig},
    core::{PlanRequest, TripPlanner},
    report::render_markdown,
    retrieval::convert_raw_dataset,
    types::ItineraryStyle,
};

fn command() -> Command {
    Command::new("trip-agent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plan a day-wise trip itinerary from a free-text request")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("plan")
                .about("Plan a trip from a free-text request")
                .arg(
                    Arg::new("request")
                        .help("Trip request, e.g. \"4 days in Jaipur with family, forts and food\"")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .value_name("PLACES")
                        .help("Destination override, e.g. \"Mumbai, Goa\""),
                )
                .arg(
                    Arg::new("days")
                        .short('n')
                        .long("days")
                        .value_name("COUNT")
                        .help("Day-count override; ignored unless a positive integer"),
                )
                .arg(
                    Arg::new("style")
                        .short('s')
                        .long("style")
                        .value_name("STYLE")
                        .value_parser(["standard", "relaxed", "packed"])
                        .default_value("standard")
                        .help("Itinerary pace"),
                )
                .arg(
                    Arg::new("from")
                        .short('f')
                        .long("from")
                        .value_name("CITY")
                        .help("Starting city, adds travel route hints to the report"),
                )
                .arg(
                    Arg::new("dataset")
                        .long("dataset")
                        .value_name("CSV")
                        .help("Attraction dataset (or set TRIP_DATASET)"),
                )
                .arg(
                    Arg::new("top-k")
                        .short('k')
                        .long("top-k")
                        .value_name("COUNT")
                        .value_parser(clap::value_parser!(usize))
                        .help("Number of attractions to retrieve (or set TRIP_TOP_K)"),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .value_name("MODEL")
                        .help("Chat model to use (or set TRIP_CHAT_MODEL)"),
                )
                .arg(
                    Arg::new("embedder")
                        .short('e')
                        .long("embedder")
                        .value_name("KIND")
                        .value_parser(["openai", "hashed"])
                        .help("Embedder for the retrieval index (or set TRIP_EMBEDDER)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the full plan as JSON instead of Markdown"),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a raw places export into the attraction dataset format")
                .arg(
                    Arg::new("input")
                        .help("Raw CSV export")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .help("Destination CSV")
                        .required(true)
                        .index(2),
                ),
        )
}

/// CLI entry point for the trip-agent binary
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("plan", args)) => run_plan(args).await,
        Some(("convert", args)) => run_convert(args),
        _ => unreachable!("clap enforces a subcommand"),
    }
}

fn config_from_args(args: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env()?;

    if let Some(dataset) = args.get_one::<String>("dataset") {
        config.dataset_path = PathBuf::from(dataset);
    }
    if let Some(top_k) = args.get_one::<usize>("top-k") {
        config.top_k = *top_k;
    }
    if let Some(model) = args.get_one::<String>("model") {
        config.chat_model = model.clone();
    }
    if let Some(embedder) = args.get_one::<String>("embedder") {
        config.embedder = embedder.parse::<EmbedderKind>()?;
    }

    Ok(config)
}

fn request_from_args(args: &ArgMatches) -> PlanRequest {
    let text = args
        .get_one::<String>("request")
        .cloned()
        .unwrap_or_default();
    let mut request = PlanRequest::new(text);

    if let Some(destination) = args.get_one::<String>("destination") {
        request = request.with_destination(destination.as_str());
    }
    if let Some(days) = args.get_one::<String>("days") {
        request = request.with_days(days);
    }
    if let Some(style) = args.get_one::<String>("style") {
        request = request.with_style(ItineraryStyle::normalize(style));
    }

    request
}

async fn run_plan(args: &ArgMatches) -> anyhow::Result<()> {
    let config = config_from_args(args)?;

    info!("Using model: {}", config.chat_model);
    info!("Dataset: {}", config.dataset_path.display());

    let planner = TripPlanner::from_config(&config)
        .await
        .context("failed to prepare the attraction index")?;
    let request = request_from_args(args);

    let plan = match planner.plan(&request).await {
        Ok(plan) => plan,
        Err(e) => {
            error!("Trip planning failed: {}", e);
            return Err(e.into());
        }
    };

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        let origin = args.get_one::<String>("from").map(String::as_str);
        println!("{}", render_markdown(&plan, origin));
    }

    Ok(())
}

fn run_convert(args: &ArgMatches) -> anyhow::Result<()> {
    let (Some(input), Some(output)) = (
        args.get_one::<String>("input"),
        args.get_one::<String>("output"),
    ) else {
        anyhow::bail!("convert needs an input and an output path");
    };

    let written = convert_raw_dataset(input, output)
        .with_context(|| format!("failed to convert {}", input))?;
    info!("Wrote {} attractions to {}", written, output);
    println!("Converted {} rows into {}", written, output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_plan_arguments_become_request() {
        let matches = command()
            .try_get_matches_from([
                "trip-agent",
                "plan",
                "weekend trip",
                "--destination",
                "Jaipur",
                "--days",
                "2",
                "--style",
                "relaxed",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let request = request_from_args(args);

        assert_eq!(request.text, "weekend trip");
        assert_eq!(request.destination.as_deref(), Some("Jaipur"));
        assert_eq!(request.days.as_deref(), Some("2"));
        assert_eq!(request.style, Some(ItineraryStyle::Relaxed));
    }

    #[test]
    fn test_unknown_style_is_rejected() {
        let result = command().try_get_matches_from([
            "trip-agent",
            "plan",
            "anything",
            "--style",
            "frantic",
        ]);
        assert!(result.is_err());
    }
}
