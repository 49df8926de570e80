//! CLI binary for stamm: pack, lay out, inspect, and render family tree archives.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stamm_core::archive::{self, Archive, PROFILE_EXTENSION};
use stamm_core::config::StammConfig;
use stamm_layout::scene::{Point, Scene};
use stamm_layout::{Cell, Layout, export};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "stamm", about = "Family tree archives and generational layout")]
struct Cli {
    /// Directory holding stamm.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack person records and a relationship document into a .stamm archive
    Create {
        /// Archive to write
        output: PathBuf,

        /// Record files, or directories searched for *.dfile records (repeatable)
        #[arg(long, required = true, num_args = 1..)]
        profiles: Vec<PathBuf>,

        /// JSON file mapping person ids to parents and spouse
        #[arg(long)]
        relationships: PathBuf,
    },

    /// Print generation levels, slots, edges, and warnings
    Layout {
        archive: PathBuf,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Render the tree as SVG
    Render {
        archive: PathBuf,

        /// Output file (defaults to the archive name with .svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the raw record of one person
    Show {
        archive: PathBuf,

        /// Person id (record file name)
        person: Option<String>,

        /// Pick the person whose box contains this scene point, e.g. "120,80"
        #[arg(long, conflicts_with = "person")]
        at: Option<String>,
    },

    /// Report dangling references and cyclic ancestry
    Validate { archive: PathBuf },

    /// Show archive statistics
    Info { archive: PathBuf },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = StammConfig::load(&project_root)?;

    match cli.command {
        Commands::Create {
            output,
            profiles,
            relationships,
        } => cmd_create(&config, &output, &profiles, &relationships),
        Commands::Layout { archive, format } => cmd_layout(&archive, &format),
        Commands::Render { archive, output } => cmd_render(&config, &archive, output),
        Commands::Show {
            archive,
            person,
            at,
        } => cmd_show(&config, &archive, person.as_deref(), at.as_deref()),
        Commands::Validate { archive } => cmd_validate(&archive),
        Commands::Info { archive } => cmd_info(&archive),
    }
}

/// Expand directories into the record files they contain, sorted by path.
fn collect_profile_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = walkdir::WalkDir::new(input)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(walkdir::DirEntry::into_path)
                .filter(|p| p.extension().is_some_and(|ext| ext == PROFILE_EXTENSION))
                .collect();
            if found.is_empty() {
                tracing::warn!("no *.{} records under {}", PROFILE_EXTENSION, input.display());
            }
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            anyhow::bail!("profile path not found: {}", input.display());
        }
    }
    Ok(files)
}

/// Parse "X,Y" into a scene point.
fn parse_point(text: &str) -> Result<Point> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("expected X,Y but got '{}'", text))?;
    let x: f64 = x.trim().parse().with_context(|| format!("invalid x: '{}'", x))?;
    let y: f64 = y.trim().parse().with_context(|| format!("invalid y: '{}'", y))?;
    Ok(Point::new(x, y))
}

fn load_and_layout(path: &Path) -> Result<(Archive, Layout)> {
    let archive = archive::read(path)?;
    let layout = stamm_layout::layout(&archive.graph())
        .with_context(|| format!("cannot lay out {}", path.display()))?;
    Ok((archive, layout))
}

fn cmd_create(
    config: &StammConfig,
    output: &Path,
    profiles: &[PathBuf],
    relationships: &Path,
) -> Result<()> {
    let files = collect_profile_files(profiles)?;
    let json = std::fs::read_to_string(relationships)
        .with_context(|| format!("failed to read {}", relationships.display()))?;

    archive::write_files(output, &files, &json, config.storage.compression)?;
    eprintln!("Wrote {} ({} profiles)", output.display(), files.len());
    Ok(())
}

fn cmd_layout(path: &Path, format: &str) -> Result<()> {
    let (archive, layout) = load_and_layout(path)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
        "text" => {
            for row in &layout.rows {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Single(id) => id.clone(),
                        Cell::Pair(a, b) => format!("[{} + {}]", a, b),
                    })
                    .collect();
                println!("Generation {}: {}", row.level, cells.join("  "));
            }
            println!();
            for (id, position) in &layout.positions {
                println!(
                    "  {} ({}) level {} slot {}",
                    id,
                    archive.display_name(id),
                    position.level,
                    position.slot
                );
            }
            println!();
            for edge in &layout.edges.parent_edges {
                println!("  {} -> {}", edge.from_id, edge.to_id);
            }
            for edge in &layout.edges.spouse_edges {
                println!("  {} == {}", edge.from_id, edge.to_id);
            }
            for warning in &layout.warnings {
                println!("WARN: {}", warning);
            }
        }
        _ => anyhow::bail!("Unknown layout format: {}. Use 'text' or 'json'.", format),
    }

    Ok(())
}

fn cmd_render(config: &StammConfig, path: &Path, output: Option<PathBuf>) -> Result<()> {
    let (archive, layout) = load_and_layout(path)?;
    let scene = Scene::build(&layout, &config.scene);
    let svg = export::to_svg(&scene, |id| archive.display_name(id).to_string());

    let output = output.unwrap_or_else(|| path.with_extension("svg"));
    std::fs::write(&output, svg).with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!(
        "Rendered {} persons in {} generations to {}",
        scene.boxes.len(),
        layout.generations(),
        output.display()
    );
    Ok(())
}

fn cmd_show(
    config: &StammConfig,
    path: &Path,
    person: Option<&str>,
    at: Option<&str>,
) -> Result<()> {
    let archive = archive::read(path)?;
    let id = match (person, at) {
        (Some(id), _) => id.to_string(),
        (None, Some(at)) => {
            let point = parse_point(at)?;
            let layout = stamm_layout::layout(&archive.graph())
                .with_context(|| format!("cannot lay out {}", path.display()))?;
            let scene = Scene::build(&layout, &config.scene);
            let Some(id) = scene.hit_test(point).cloned() else {
                eprintln!("No person at {},{}", point.x, point.y);
                return Ok(());
            };
            id
        }
        (None, None) => anyhow::bail!("give a person id or --at X,Y"),
    };
    print_record(&archive, &id)
}

fn print_record(archive: &Archive, id: &str) -> Result<()> {
    let profile = archive
        .profile(id)
        .with_context(|| format!("no profile '{}' in archive", id))?;
    println!("Person: {} ({})", profile.name, id);
    println!("Sex: {}", profile.sex);
    println!("\n--- Record ---\n{}", profile.raw);
    Ok(())
}

/// Every problem `validate` reports, as printable `WARN:`/`ERROR:` lines.
fn validation_issues(archive: &Archive) -> Vec<String> {
    let graph = archive.graph();
    let mut issues: Vec<String> = stamm_layout::collect_warnings(&graph)
        .iter()
        .map(|w| format!("WARN: {}", w))
        .collect();
    for (id, profile) in &archive.profiles {
        if !profile.has_name {
            issues.push(format!("WARN: profile {} has no NAME line", id));
        }
    }
    if let Err(e) = stamm_layout::levels::assign_levels(&graph) {
        issues.push(format!("ERROR: {}", e));
    }
    issues
}

fn cmd_validate(path: &Path) -> Result<()> {
    let archive = archive::read(path)?;
    let issues = validation_issues(&archive);

    if issues.is_empty() {
        let graph = archive.graph();
        eprintln!("Archive is valid. No issues found.");
        eprintln!(
            "  {} persons, {} relation entries, {} parent links",
            graph.len(),
            graph.relations().len(),
            graph.parent_edge_count()
        );
        return Ok(());
    }

    for issue in &issues {
        println!("{}", issue);
    }
    anyhow::bail!("found {} issue(s) in {}", issues.len(), path.display())
}

fn cmd_info(path: &Path) -> Result<()> {
    let archive = archive::read(path)?;
    let graph = archive.graph();

    println!("Archive: {}", path.display());
    println!("Persons: {}", graph.len());
    println!("Relation entries: {}", graph.relations().len());
    println!("Parent links: {}", graph.parent_edge_count());
    let spouses = graph.persons().filter(|p| graph.spouse_of(p).is_some()).count();
    println!("Persons with spouse: {}", spouses);

    match stamm_layout::layout(&graph) {
        Ok(layout) => {
            println!("Generations: {}", layout.generations());
            let widest = layout.rows.iter().map(|r| r.width()).max().unwrap_or(0);
            println!("Widest generation: {}", widest);
            println!("Warnings: {}", layout.warnings.len());
        }
        Err(e) => println!("Generations: unavailable ({})", e),
    }

    Ok(())
}
