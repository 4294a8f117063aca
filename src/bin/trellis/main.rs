//! Trellis CLI - planar triangulation command-line tool.
//!
//! Usage: trellis [-v] <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `trellis --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use trellis::algo::{legalize, relax, ConstraintOptions, LegalizeOptions, RelaxOptions};
use trellis::io::{self, PointSet, TriangulationOutput};
use trellis::{Triangulation, TriangulationOptions};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(author, version, about = "Planar Delaunay triangulation CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delaunay-triangulate a point set
    Triangulate {
        /// Input point set (JSON)
        input: PathBuf,

        /// Output triangulation (JSON)
        output: PathBuf,

        /// Stop legalizing after this many passes
        #[arg(long)]
        max_passes: Option<usize>,
    },

    /// Triangulate a point set with the edges of its polygon enforced
    Polygon {
        /// Input point set with a polygon (JSON)
        input: PathBuf,

        /// Output triangulation (JSON)
        output: PathBuf,

        /// Skip re-legalizing after the polygon edges are inserted
        #[arg(long)]
        no_relegalize: bool,

        /// Write all triangles, not only those inside the polygon
        #[arg(long)]
        keep_exterior: bool,
    },

    /// Display triangulation statistics for a point set
    Info {
        /// Input point set (JSON)
        input: PathBuf,
    },

    /// Triangulate, relax interior vertices, and legalize again
    Relax {
        /// Input point set (JSON)
        input: PathBuf,

        /// Output triangulation (JSON)
        output: PathBuf,

        /// Number of relaxation sweeps
        #[arg(short, long, default_value = "10")]
        iterations: usize,

        /// Step size per sweep
        #[arg(short, long, default_value = "0.05")]
        step: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Triangulate {
            input,
            output,
            max_passes,
        } => {
            cmd_triangulate(&input, &output, max_passes)?;
        }

        Commands::Polygon {
            input,
            output,
            no_relegalize,
            keep_exterior,
        } => {
            cmd_polygon(&input, &output, !no_relegalize, keep_exterior)?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Relax {
            input,
            output,
            iterations,
            step,
        } => {
            cmd_relax(&input, &output, iterations, step)?;
        }
    }

    Ok(())
}

fn load(input: &Path) -> Result<PointSet, Box<dyn std::error::Error>> {
    let set = io::load_points(input)?;
    println!("Loaded: {} points", set.points.len());
    Ok(set)
}

fn cmd_triangulate(input: &Path, output: &Path, max_passes: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let set = load(input)?;

    let options = TriangulationOptions::default().with_legalize(LegalizeOptions { max_passes });

    let start = Instant::now();
    let tri: Triangulation = Triangulation::from_points(&set.points(), &options)?;
    let elapsed = start.elapsed();

    let report = tri.legalization();
    println!(
        "Triangulated: {} triangles, {} flips in {} passes ({:.2?})",
        tri.mesh().num_bounded_faces(),
        report.flips,
        report.passes,
        elapsed
    );
    if !report.is_converged() {
        println!("Warning: legalization did not converge; the result may not be Delaunay");
    }

    io::save_output(&TriangulationOutput::from_mesh(tri.mesh()), output)?;
    println!("Saved: {}", output.display());

    Ok(())
}

fn cmd_polygon(
    input: &Path,
    output: &Path,
    relegalize: bool,
    keep_exterior: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let set = load(input)?;
    let polygon = set
        .polygon()
        .ok_or_else(|| format!("{} has no \"polygon\" entry", input.display()))?;

    let options = TriangulationOptions::default()
        .with_constraints(ConstraintOptions::default().with_relegalize(relegalize));

    let start = Instant::now();
    let tri: Triangulation = Triangulation::with_polygon(&set.points(), &polygon, &options)?;
    let elapsed = start.elapsed();

    if let Some(report) = tri.constraints() {
        println!(
            "Constrained: {} edges inserted, {} already present, {} flips ({:.2?})",
            report.inserted, report.already_present, report.flips, elapsed
        );
    }

    let result = if keep_exterior {
        TriangulationOutput::from_mesh(tri.mesh())
    } else {
        let (vertices, triangles) = tri.interior_triangles();
        TriangulationOutput::from_triangles(&vertices, triangles)
    };
    println!("Triangles: {}", result.triangles.len());

    io::save_output(&result, output)?;
    println!("Saved: {}", output.display());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let set = load(input)?;
    let options = TriangulationOptions::default();
    let tri: Triangulation = match set.polygon() {
        Some(polygon) => Triangulation::with_polygon(&set.points(), &polygon, &options)?,
        None => Triangulation::from_points(&set.points(), &options)?,
    };
    let mesh = tri.mesh();

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Triangles: {}", mesh.num_bounded_faces());
    println!("Hull vertices: {}", mesh.face_degree(mesh.outer_face()));

    let mut total_area = 0.0;
    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for f in mesh.bounded_face_ids() {
        let area = mesh.face_signed_area(f);
        total_area += area;
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }
    println!("Hull area: {:.6}", total_area);
    println!("Triangle area range: [{:.6}, {:.6}]", min_area, max_area);

    let report = tri.legalization();
    println!(
        "Legalization: {:?} after {} passes, {} flips",
        report.convergence, report.passes, report.flips
    );

    if let Some(report) = tri.constraints() {
        let (_, inside) = tri.interior_triangles();
        println!(
            "Polygon: {} edges inserted, {} already present, {} triangles inside",
            report.inserted,
            report.already_present,
            inside.len()
        );
    }

    match mesh.validate() {
        Ok(()) => println!("Connectivity: valid"),
        Err(e) => println!("Connectivity: INVALID ({})", e),
    }

    Ok(())
}

fn cmd_relax(input: &Path, output: &Path, iterations: usize, step: f64) -> Result<(), Box<dyn std::error::Error>> {
    let set = load(input)?;
    let mut tri: Triangulation = Triangulation::from_points(&set.points(), &TriangulationOptions::default())?;

    let options = RelaxOptions::default().with_iterations(iterations).with_step(step);

    let start = Instant::now();
    println!("Relaxing ({} iterations, step={})...", iterations, step);
    relax(tri.mesh_mut(), &options)?;
    let report = legalize(tri.mesh_mut(), &LegalizeOptions::default());
    let elapsed = start.elapsed();

    println!("Re-legalized: {} flips in {} passes ({:.2?})", report.flips, report.passes, elapsed);

    io::save_output(&TriangulationOutput::from_mesh(tri.mesh()), output)?;
    println!("Saved: {}", output.display());

    Ok(())
}
