//! Parsing Options.
//! `--command {cmd}` or `-k`, defaults to `process`

use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineCommand {
    Process,
    Resolve,
    Run,
    Reachability,
    Liveness,
    Boundedness,
    Incidence,
    Structural,
    Analyze,
    Validate,
}

fn make_options_parser() -> clap::Command {
    let parser = Command::new("pn")
        .no_binary_name(true)
        .version("v0.1.0")
        .about("Petri net simulation and analysis")
        .arg(
            Arg::new("command")
                .short('k')
                .long("command")
                .help("The engine operation to run")
                .default_value("process")
                .value_parser([
                    "process",
                    "resolve",
                    "run",
                    "reachability",
                    "liveness",
                    "boundedness",
                    "incidence",
                    "structural",
                    "analyze",
                    "validate",
                ]),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Net description or validation request (.json, .ron, .yaml)")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path to file where the result will be stored, stdout if absent"),
        )
        .arg(
            Arg::new("select")
                .short('s')
                .long("select")
                .value_name("ID")
                .help("Transition chosen to resolve a conflict"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .value_parser(clap::value_parser!(u64))
                .help("Seed for the random choice in non-deterministic mode"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .default_value("pn.toml"),
        )
        .arg(
            Arg::new("dot")
                .long("dot")
                .value_name("FILE")
                .help("Write the explored reachability graph as Graphviz DOT"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Do not print the summary line"),
        );
    parser
}

#[derive(Debug, Clone)]
pub struct Options {
    pub command: EngineCommand,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub select: Option<String>,
    pub seed: Option<u64>,
    pub config: PathBuf,
    pub dot: Option<PathBuf>,
    pub quiet: bool,
}

impl Options {
    pub fn parse_from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let flags = shellwords::split(s)?;
        Self::parse_from_args(&flags)
    }

    pub fn parse_from_args(flags: &[String]) -> Result<Self, Box<dyn Error>> {
        let app = make_options_parser();
        let matches = app.try_get_matches_from(flags.iter())?;
        let command = match matches.get_one::<String>("command").map(String::as_str) {
            Some("process") => EngineCommand::Process,
            Some("resolve") => EngineCommand::Resolve,
            Some("run") => EngineCommand::Run,
            Some("reachability") => EngineCommand::Reachability,
            Some("liveness") => EngineCommand::Liveness,
            Some("boundedness") => EngineCommand::Boundedness,
            Some("incidence") => EngineCommand::Incidence,
            Some("structural") => EngineCommand::Structural,
            Some("analyze") => EngineCommand::Analyze,
            Some("validate") => EngineCommand::Validate,
            _ => return Err("UnsupportedCommand")?,
        };

        let input = matches
            .get_one::<String>("input")
            .map(PathBuf::from)
            .ok_or("MissingInput")?;
        let output = matches.get_one::<String>("output").map(PathBuf::from);
        let select = matches.get_one::<String>("select").cloned();
        let seed = matches.get_one::<u64>("seed").copied();
        let config = matches
            .get_one::<String>("config")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("pn.toml"));
        let dot = matches.get_one::<String>("dot").map(PathBuf::from);

        Ok(Options {
            command,
            input,
            output,
            select,
            seed,
            config,
            dot,
            quiet: matches.get_flag("quiet"),
        })
    }
}
