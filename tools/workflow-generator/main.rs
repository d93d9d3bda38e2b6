use clap::Parser;
use intakeflow::prelude::*;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use std::fs;

/// A CLI tool to generate random intake workflows for exercising the validator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated workflow document to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Number of question steps on the main path
    #[arg(long, default_value_t = 6)]
    steps: usize,

    /// Number of branch points to insert along the path
    #[arg(long, default_value_t = 2)]
    branches: usize,

    /// Probability (0.0 to 1.0) of injecting a guardrail defect into each step
    #[arg(long, default_value_t = 0.0)]
    defect_rate: f64,
}

const QUESTIONS: [(&str, &str, &str, InputType); 6] = [
    ("vitals", "vid_height", "height", InputType::Number),
    ("vitals", "vid_weight", "weight", InputType::Number),
    ("vitals", "vid_bp", "systolic", InputType::Number),
    ("vitals", "vid_temp", "temperature", InputType::Number),
    ("symptoms", "vid_pain", "pain_level", InputType::Choice),
    ("symptoms", "vid_fever", "fever_days", InputType::Number),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rng();

    if !(0.0..=1.0).contains(&cli.defect_rate) {
        eprintln!(
            "Error: --defect-rate ({}) must be between 0.0 and 1.0",
            cli.defect_rate
        );
        std::process::exit(1);
    }
    if cli.steps == 0 {
        eprintln!("Error: --steps must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating workflow ({} steps, {} branches, defect rate {})...",
        cli.steps, cli.branches, cli.defect_rate
    );

    let mut graph = WorkflowGraph::builder()
        .with_name("Generated Intake Workflow")
        .with_id_generator(Box::new(TypedIds::default()))
        .build();
    generate(&mut graph, &mut rng, &cli)?;

    let violations = validate(graph.snapshot());
    println!(
        "-> Generated {} nodes and {} edges with {} violation(s).",
        graph.nodes().len(),
        graph.edges().len(),
        violations.len()
    );

    let document = export_document(graph.snapshot());
    fs::write(&cli.output, document.to_json_pretty()?)?;
    println!("Successfully generated and saved workflow to '{}'", cli.output);
    Ok(())
}

fn generate(graph: &mut WorkflowGraph, rng: &mut ThreadRng, cli: &Cli) -> Result<(), GraphError> {
    let mut y = 0.0;
    let mut next_position = || {
        y += 150.0;
        Position::new(0.0, y)
    };

    let start = graph.add_node(NodeType::Start, next_position());
    let end_position = Position::new(0.0, 150.0 * (cli.steps as f64 + 4.0));
    let end_id = graph.add_node(NodeType::End, end_position);
    let mut previous = start;
    let mut produced: Vec<String> = Vec::new();
    let branch_every = (cli.steps / (cli.branches + 1)).max(1);
    let mut branches_left = cli.branches;

    for index in 0..cli.steps {
        let step = add_question(graph, rng, cli.defect_rate, next_position(), index);
        if let Some(name) = graph
            .node(&step)
            .and_then(|n| n.as_avatar_step())
            .and_then(|d| d.variable_name.clone())
        {
            produced.push(name);
        }
        if !rng.random_bool(cli.defect_rate) {
            graph.add_edge(Connection::new(&previous, &step))?;
        }
        previous = step;

        if branches_left > 0 && (index + 1) % branch_every == 0 && !produced.is_empty() {
            let position = next_position();
            previous = add_branch(graph, rng, cli.defect_rate, &previous, &produced, position)?;
            branches_left -= 1;
        }
    }

    graph.add_edge(Connection::new(&previous, &end_id))?;
    if rng.random_bool(cli.defect_rate) {
        graph.delete_node(&end_id);
    }
    Ok(())
}

fn add_question(
    graph: &mut WorkflowGraph,
    rng: &mut ThreadRng,
    defect_rate: f64,
    position: Position,
    index: usize,
) -> String {
    let (category, video, variable, input_type) =
        *QUESTIONS.choose(rng).unwrap_or(&QUESTIONS[0]);
    let id = graph.add_node(NodeType::AvatarStep, position);
    let video_id = if rng.random_bool(defect_rate) { "" } else { video };
    graph.update_node_data(
        &id,
        NodePatch {
            category: Some(category.to_string()),
            video_id: Some(video_id.to_string()),
            question_text: Some(format!("Question {}: please enter your {}", index + 1, variable)),
            input_type: Some(input_type),
            is_mandatory: Some(rng.random_bool(0.5)),
            variable_name: Some(format!("{}_{}", variable, index + 1)),
            ..Default::default()
        },
    );
    id
}

/// Inserts a computation and a two-way branch after `previous`, joining both arms
/// into a single follow-up step. Returns the join step.
fn add_branch(
    graph: &mut WorkflowGraph,
    rng: &mut ThreadRng,
    defect_rate: f64,
    previous: &str,
    produced: &[String],
    position: Position,
) -> Result<String, GraphError> {
    let input = produced.choose(rng).cloned().unwrap_or_default();
    let score = format!("score_{}", produced.len());

    let compute = graph.add_node(NodeType::Computation, position);
    let output = if rng.random_bool(defect_rate) {
        String::new()
    } else {
        score.clone()
    };
    graph.update_node_data(
        &compute,
        NodePatch {
            label: Some(format!("Score from {}", input)),
            formula: Some(format!("{} * 10", input)),
            output_variable: Some(output),
            ..Default::default()
        },
    );
    graph.add_edge(Connection::new(previous, &compute))?;

    let branch = graph.add_node(NodeType::Branch, position);
    graph.add_edge(Connection::new(&compute, &branch))?;
    let threshold: f64 = rng.random_range(10.0_f64..90.0).round();
    let variable = if rng.random_bool(defect_rate) {
        "unknown_score".to_string()
    } else {
        score
    };

    let join = graph.add_node(NodeType::AvatarStep, position);
    graph.update_node_data(
        &join,
        NodePatch {
            category: Some("onboarding".to_string()),
            video_id: Some("vid_welcome".to_string()),
            question_text: Some("Thank you, let's continue.".to_string()),
            input_type: Some(InputType::None),
            ..Default::default()
        },
    );

    for operator in [Operator::SmallerThan, Operator::GreaterThanOrEqual] {
        let Some(condition) = graph.add_condition(&branch) else {
            continue;
        };
        graph.update_condition(
            &branch,
            &condition,
            ConditionPatch {
                variable: Some(variable.clone()),
                operator: Some(operator),
                value: Some(ConditionValue::Number(threshold)),
            },
        );
        let arm = graph.add_node(NodeType::AvatarStep, position);
        graph.update_node_data(
            &arm,
            NodePatch {
                category: Some("symptoms".to_string()),
                video_id: Some("vid_headache".to_string()),
                question_text: Some(format!("Score {} {}", operator, threshold)),
                input_type: Some(InputType::Text),
                ..Default::default()
            },
        );
        graph.add_edge(Connection::new(&branch, &arm).with_source_handle(&condition))?;
        graph.add_edge(Connection::new(&arm, &join))?;
    }
    Ok(join)
}
