use clap::{Parser, Subcommand};
use intakeflow::prelude::*;
use intakeflow::seed;
use itertools::Itertools;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Validate, export and edit clinical-intake workflow documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,

    /// Log graph mutations and validation passes
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Check a workflow document against the guardrails
    Validate {
        /// Path to the workflow export document
        workflow_path: String,
    },
    /// Re-export a workflow document, refusing while violations remain
    Export {
        /// Path to the workflow export document
        workflow_path: String,
        /// Where to write the export (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Export even if guardrail violations remain
        #[arg(long)]
        force: bool,
    },
    /// Write the stock BMI intake workflow
    Seed {
        #[arg(short, long, default_value = "medical-workflow.json")]
        output: String,
    },
    /// Apply a JSON array of commands to a workflow document
    Apply {
        /// Path to the workflow export document
        workflow_path: String,
        /// Path to a JSON array of commands
        commands_path: String,
        /// Where to write the result (defaults to overwriting the workflow)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the stock video library
    Library,
}

/// How loudly the report presents a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Severity {
    High,
    Medium,
    Low,
}

fn severity(kind: ViolationKind) -> Severity {
    match kind {
        ViolationKind::MissingVideo | ViolationKind::NoEndNode => Severity::High,
        ViolationKind::UndefinedVariable | ViolationKind::IncompleteComputation => {
            Severity::Medium
        }
        ViolationKind::Orphan => Severity::Low,
    }
}

fn icon(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::MissingVideo => "🎬",
        ViolationKind::UndefinedVariable | ViolationKind::IncompleteComputation => "📊",
        ViolationKind::Orphan => "🔗",
        ViolationKind::NoEndNode => "🏁",
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        CliCommand::Validate { workflow_path } => run_validate(&workflow_path),
        CliCommand::Export {
            workflow_path,
            output,
            force,
        } => run_export(&workflow_path, output.as_deref(), force),
        CliCommand::Seed { output } => run_seed(&output),
        CliCommand::Apply {
            workflow_path,
            commands_path,
            output,
        } => run_apply(&workflow_path, &commands_path, output.as_deref()),
        CliCommand::Library => run_library(),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("intakeflow=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_graph(path: &str) -> WorkflowGraph {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read workflow file '{}': {}", path, e))
    });
    let document = ExportDocument::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)));
    WorkflowGraph::load(document)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", path, e)))
}

fn write_document(document: &ExportDocument, output: Option<&str>) {
    let json = document
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    match output {
        Some(path) => {
            fs::write(path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Could not write to file '{}': {}", path, e))
            });
            println!("Workflow written to '{}'", path);
        }
        None => println!("{}", json),
    }
}

fn print_report(violations: &[Violation]) {
    println!("\n--- Clinical Safety Violations ---");
    for (kind, group) in &violations
        .iter()
        .sorted_by_key(|v| (severity(v.kind()), v.kind()))
        .chunk_by(|v| v.kind())
    {
        for violation in group {
            println!(
                "  {} [{:?}] {}",
                icon(kind),
                severity(kind),
                violation
            );
        }
    }
    let counts = violations.iter().counts_by(|v| severity(v.kind()));
    println!(
        "\n{} violation(s): {}",
        violations.len(),
        counts
            .iter()
            .sorted()
            .map(|(severity, count)| format!("{:?}: {}", severity, count))
            .join(", ")
    );
}

fn run_validate(path: &str) {
    let start = Instant::now();
    let graph = load_graph(path);
    let violations = validate(graph.snapshot());
    let duration = start.elapsed();

    let workflow = graph.snapshot();
    println!(
        "Workflow '{}': {} nodes, {} edges (checked in {:?})",
        workflow.name,
        workflow.nodes.len(),
        workflow.edges.len(),
        duration
    );
    let variables = defined_variables(workflow);
    println!(
        "Defined variables: {}",
        if variables.is_empty() {
            "none".to_string()
        } else {
            variables.iter().sorted().join(", ")
        }
    );

    if violations.is_empty() {
        println!("\n-> No violations. Ready to export.");
        return;
    }
    print_report(&violations);
    std::process::exit(1);
}

fn run_export(path: &str, output: Option<&str>, force: bool) {
    let graph = load_graph(path);
    let document = if force {
        export_document(graph.snapshot())
    } else {
        match export_checked(graph.snapshot()) {
            Ok(document) => document,
            Err(ExportError::Blocked(violations)) => {
                eprintln!("Cannot export workflow. Please fix the following issues:");
                print_report(&violations);
                std::process::exit(1);
            }
            Err(e) => exit_with_error(&e.to_string()),
        }
    };
    write_document(&document, output);
}

fn run_seed(output: &str) {
    let graph = seed::bmi_intake()
        .unwrap_or_else(|e| exit_with_error(&format!("Seed workflow failed to load: {}", e)));
    write_document(&export_document(graph.snapshot()), Some(output));
}

fn run_apply(path: &str, commands_path: &str, output: Option<&str>) {
    let mut graph = load_graph(path);
    let json = fs::read_to_string(commands_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read commands file '{}': {}",
            commands_path, e
        ))
    });
    let commands: Vec<Command> = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse commands: {}", e)));

    for (index, command) in commands.into_iter().enumerate() {
        match graph.apply(command) {
            Ok(Outcome::NodeAdded(id)) => println!("  [{}] node added: {}", index, id),
            Ok(Outcome::EdgeAdded(id)) => println!("  [{}] edge added: {}", index, id),
            Ok(Outcome::ConditionAdded(id)) => println!("  [{}] condition added: {}", index, id),
            Ok(Outcome::Applied) => {}
            Ok(Outcome::Ignored) => println!("  [{}] ignored: nothing to act on", index),
            Err(e) => exit_with_error(&format!("Command {} rejected: {}", index, e)),
        }
    }

    let violations = validate(graph.snapshot());
    if !violations.is_empty() {
        print_report(&violations);
    }
    write_document(&export_document(graph.snapshot()), Some(output.unwrap_or(path)));
}

fn run_library() {
    let library = VideoLibrary::mock();
    for category in library.categories() {
        println!("{} ({})", category.name, category.id);
        for video in &category.videos {
            println!("  - {:<20} {:<28} {}", video.id, video.title, video.duration);
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
