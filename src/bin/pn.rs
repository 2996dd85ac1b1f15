use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use pn_engine::analysis::{self, AnalysisReport, ReachabilityConfig};
use pn_engine::config::EngineConfig;
use pn_engine::net::{self, Net, NetDescription, ValidationRequest};
use pn_engine::options::{EngineCommand, Options};
use pn_engine::simulation::{RandomChooser, Run, Simulator};
use pn_engine::validate;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary<'a> {
    #[serde(flatten)]
    run: &'a Run,
    final_state: NetDescription,
}

fn main() {
    if std::env::var("PN_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("PN_LOG")
            .write_style("PN_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(2);
        }
    }
}

fn run() -> Result<i32> {
    let mut args = shellwords::split(&std::env::var("PN_FLAGS").unwrap_or_default())
        .map_err(|e| anyhow!("invalid PN_FLAGS: {}", e))?;
    args.extend(std::env::args().skip(1));

    let options = Options::parse_from_args(&args).map_err(|e| anyhow!("{}", e))?;
    log::debug!("PN options: {:?}", options);

    let config = EngineConfig::load_from_file(&options.config)?;
    let seed = options.seed.or(config.seed);

    if options.command == EngineCommand::Validate {
        let request: ValidationRequest = net::io::read_file(&options.input)
            .with_context(|| format!("Failed to read validation request: {:?}", options.input))?;
        let report = validate::validate_request(&request, &config)?;
        emit(&options, &report)?;
        if !options.quiet {
            eprintln!("{}", report.message);
        }
        return Ok(if report.valid { 0 } else { 1 });
    }

    let description: NetDescription = net::io::read_file(&options.input)
        .with_context(|| format!("Failed to read net description: {:?}", options.input))?;
    let petri_net = Net::try_from(&description)?;

    match options.command {
        EngineCommand::Process => {
            let mut simulator = Simulator::new(RandomChooser::from_seed(seed));
            let step = simulator.process(&petri_net);
            log::info!("process: {:?}", step.state);
            emit(&options, &NetDescription::from(&step.net))?;
        }
        EngineCommand::Resolve => {
            let selected = match options.select.as_deref() {
                Some(id) => id,
                None => description.selection()?,
            };
            let step = pn_engine::simulation::resolve_conflict(&petri_net, selected)?;
            log::info!("resolve {}: {:?}", selected, step.state);
            emit(&options, &NetDescription::from(&step.net))?;
        }
        EngineCommand::Run => {
            let mut simulator = Simulator::new(RandomChooser::from_seed(seed));
            let run = simulator.simulate(&petri_net, config.max_simulation_steps);
            let summary = RunSummary {
                final_state: NetDescription::from(&run.net),
                run: &run,
            };
            emit(&options, &summary)?;
        }
        EngineCommand::Reachability => {
            let reachability = ReachabilityConfig {
                state_limit: config.max_reachable_states,
            };
            let (report, graph) = analysis::explore(&petri_net, &reachability);
            if let Some(dot) = &options.dot {
                graph
                    .write_dot(dot)
                    .with_context(|| format!("Failed to write dot file: {:?}", dot))?;
            }
            emit(&options, &AnalysisReport::Reachability(report))?;
        }
        EngineCommand::Liveness => {
            let report = analysis::analyze_liveness(&petri_net);
            emit(&options, &AnalysisReport::Liveness(report))?;
        }
        EngineCommand::Boundedness => {
            let report = analysis::analyze_boundedness(&petri_net);
            emit(&options, &AnalysisReport::Boundedness(report))?;
        }
        EngineCommand::Incidence => {
            let report = analysis::compute_incidence_matrix(&petri_net);
            emit(&options, &AnalysisReport::Incidence(report))?;
        }
        EngineCommand::Structural => {
            let report = analysis::perform_structural_analysis(&petri_net);
            emit(&options, &AnalysisReport::Structural(report))?;
        }
        EngineCommand::Analyze => {
            let reports = analysis::analyze_all(&petri_net, &config);
            if !options.quiet {
                for report in &reports {
                    eprintln!("{}: {}", report.analysis_type(), report.details());
                }
            }
            emit(&options, &reports)?;
        }
        _ => return Err(anyhow!("unsupported command: {:?}", options.command)),
    }
    Ok(0)
}

/// 有 `-o` 时按扩展名写文件，否则以 JSON 输出到 stdout。
fn emit<T: Serialize>(options: &Options, value: &T) -> Result<()> {
    match &options.output {
        Some(path) => net::io::write_file(path, value)
            .with_context(|| format!("Failed to write output: {:?}", path))?,
        None => println!("{}", net::io::to_json_string(value)?),
    }
    Ok(())
}
