//! CLI logic for the Flowlayout tool.
//!
//! Reads a graph from JSON, lays it out and writes the result back as JSON.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use config::ConfigError;
pub use error::CliError;

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
};

use log::{debug, info, warn};

use flowlayout::{LayoutEngine, LayoutInput, LayoutOutput};

/// Run the Flowlayout CLI application
///
/// Loads the configuration, applies command-line overrides, lays out the
/// input graph and writes the resulting layout to the output file.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed graph files
/// - Invalid configuration values or node boxes
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let mut config = config::load_config(args.config.as_ref())?;
    let mut simulation = config.simulation().clone();
    if let Some(max_iterations) = args.max_iterations {
        simulation = simulation.with_max_iterations(max_iterations);
    }
    if let Some(seed) = args.seed {
        simulation = simulation.with_seed(Some(seed));
    }
    *config.simulation_mut() = simulation;
    let max_iterations = config.simulation().max_iterations();
    let engine = LayoutEngine::new(config)?;

    let source = fs::read_to_string(&args.input)?;
    let input: LayoutInput = serde_json::from_str(&source)
        .map_err(|err| CliError::new_json_error(&args.input, err, source.as_str()))?;
    debug!(nodes = input.nodes().len(), edges = input.edges().len(); "Graph loaded");

    let output = match &args.frames {
        Some(frames_path) => run_with_frames(&engine, &input, max_iterations, frames_path)?,
        None => engine.run(&input, max_iterations)?,
    };

    if let Some(extent) = output.bounds() {
        info!(
            iterations = output.iterations_used(),
            termination:? = output.termination(),
            width = extent.width(),
            height = extent.height();
            "Layout extent"
        );
    }
    if output.timed_out() {
        warn!(iterations = output.iterations_used(); "Layout did not settle within the iteration budget");
    }

    let json = serde_json::to_string_pretty(&output).map_err(io::Error::from)?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}

/// Runs the layout while streaming every iteration's snapshot to
/// `frames_path` as one JSON object per line.
fn run_with_frames(
    engine: &LayoutEngine,
    input: &LayoutInput,
    max_iterations: usize,
    frames_path: &str,
) -> Result<LayoutOutput, CliError> {
    let mut writer = BufWriter::new(File::create(frames_path)?);
    let mut frame_error: Option<io::Error> = None;

    let output = engine.run_observed(input, max_iterations, |snapshot, _index| {
        if frame_error.is_some() {
            return;
        }
        if let Err(err) = write_frame(&mut writer, snapshot) {
            frame_error = Some(err);
        }
    })?;

    if let Some(err) = frame_error {
        return Err(err.into());
    }
    writer.flush()?;

    info!(frames_file = frames_path, frames = output.iterations_used(); "Frames exported");
    Ok(output)
}

fn write_frame(writer: &mut impl Write, snapshot: &LayoutOutput) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, snapshot)?;
    writeln!(writer)
}
