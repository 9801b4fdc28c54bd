//  VALIDATOR.rs
//    by Lut99
//
//  Created:
//    23 Sep 2026, 15:31:02
//  Last edited:
//    09 Oct 2026, 11:40:57
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements a command-line validator for PRP policies.
//

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use error_trace::toplevel;
use fond_validator::analysis::{analyse, Report};
use fond_validator::artifacts::unhandled_states;
use fond_validator::domain::Domain;
use fond_validator::graph::ExecutionGraph;
use fond_validator::plans::{all_plans, shortest_plans, Plan};
use fond_validator::policy::prp::RulePolicy;
use fond_validator::policy::LoadPolicy as _;
use fond_validator::task::GroundTask;
use humanlog::{DebugMode, HumanLogger};
use log::{debug, error, info};


/***** ARGUMENTS *****/
/// Which plans to print after validation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum PlanMode {
    /// Don't print any plans.
    #[default]
    None,
    /// Print all the shortest plans.
    Shortest,
    /// Print all plans that don't visit a state twice.
    All,
}

/// Defines arguments to the validator.
#[derive(Debug, Parser)]
pub struct Arguments {
    /// If given, enables more verbose logging.
    #[clap(long, global = true)]
    debug: bool,

    /// The grounded task to validate against, as JSON.
    #[clap(short, long)]
    task:   PathBuf,
    /// The policy to validate, as emitted by PRP.
    #[clap(short, long)]
    policy: PathBuf,

    /// If given, writes the execution graph as Graphviz DOT to this path.
    #[clap(long)]
    dot: Option<PathBuf>,
    /// If given, writes the mapping of actions to their outcomes to this path.
    #[clap(long)]
    action_map: Option<PathBuf>,
    /// If given, writes the states the policy did not handle to this path (if there are any).
    #[clap(long)]
    unhandled: Option<PathBuf>,
    /// Which plans to extract from the execution graph.
    #[clap(long, value_enum, default_value_t = PlanMode::None)]
    plans: PlanMode,
}





/***** HELPER FUNCTIONS *****/
/// Writes an artifact to disk, or exits if that fails.
fn write_artifact(what: &str, path: &Path, contents: String) {
    debug!("Writing {what} to '{}'...", path.display());
    if let Err(err) = fs::write(path, contents) {
        error!("{}", toplevel!(("Failed to write {what} to '{}'", path.display()), err));
        std::process::exit(1);
    }
    println!("{:>18}: {}", what, path.display());
}

/// Prints a list of plans.
fn print_plans(what: &str, plans: &[Plan]) {
    println!();
    println!("{what} ({}):", plans.len());
    for plan in plans {
        println!("  {plan}");
    }
}





/***** ENTRYPOINT *****/
fn main() {
    // Parse the CLI arguments
    let args = Arguments::parse();

    // Setup the logger
    if let Err(err) = HumanLogger::terminal(if args.debug { DebugMode::Full } else { DebugMode::HumanFriendly }).init() {
        eprintln!("WARNING: Failed to setup logger: {err} (no logging for this session)");
    }
    info!("fond-validator {} - v{}", env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"));

    // Load the task
    debug!("Loading task '{}'...", args.task.display());
    let task: GroundTask = match GroundTask::from_path(&args.task) {
        Ok(task) => task,
        Err(err) => {
            error!("{}", toplevel!(("Failed to load task '{}'", args.task.display()), err));
            std::process::exit(1);
        },
    };
    let domain: Domain = match Domain::new(&task) {
        Ok(domain) => domain,
        Err(err) => {
            error!("{}", toplevel!(("Failed to interpret task '{}'", args.task.display()), err));
            std::process::exit(1);
        },
    };

    // Load the policy
    debug!("Loading policy '{}'...", args.policy.display());
    let mut policy: RulePolicy = match RulePolicy::load(&args.policy, domain.fluents()) {
        Ok(policy) => policy,
        Err(err) => {
            error!("{}", toplevel!(("Failed to load policy '{}'", args.policy.display()), err));
            std::process::exit(1);
        },
    };

    // Simulate it
    debug!("Simulating policy over {} action(s)...", domain.actions().len());
    let graph: ExecutionGraph = match ExecutionGraph::build(&domain, &mut policy) {
        Ok(graph) => graph,
        Err(err) => {
            error!("{}", toplevel!(("Failed to simulate policy '{}'", args.policy.display()), err));
            std::process::exit(1);
        },
    };

    // Write what we're asked to write
    if let Some(path) = &args.action_map {
        write_artifact("Action mapping", path, domain.actions().mapping(domain.fluents()).to_string());
    }
    if let Some(path) = &args.unhandled {
        if !graph.unhandled().is_empty() {
            write_artifact("Unhandled states", path, unhandled_states(&graph, domain.fluents()).to_string());
        }
    }
    if let Some(path) = &args.dot {
        write_artifact("Policy graph", path, graph.to_dot());
    }

    // Report the classification
    let report: Report = analyse(&graph);
    println!();
    println!("$> {report}");

    // Finally, any plans
    match args.plans {
        PlanMode::None => {},
        PlanMode::Shortest => print_plans("Shortest plans", &shortest_plans(&graph)),
        PlanMode::All => {
            let (plans, actions) = all_plans(&graph);
            print_plans("All plans", &plans);
            println!();
            println!("Actions used ({}): {}", actions.len(), actions.into_iter().collect::<Vec<String>>().join(", "));
        },
    }
}
