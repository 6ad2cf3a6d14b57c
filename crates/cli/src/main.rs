//! Floorplan CLI - run editor commands and queries against layout files.
//!
//! Layouts are JSON documents. Commands use the same tagged JSON the
//! editor API speaks, so a recorded session can be replayed from a file.

use anyhow::{bail, Context, Result};
use api::{execute_command, execute_query, Command, CommandResult, EditorConfig, LogNotifier, PropertiesEditor, Query};
use clap::{Parser, Subcommand};
use node::{normalize_hex_color, CanvasSize, ItemId};
use scene::{LayoutDocument, Scene};
use shape_library::{CustomShapeDraft, JsonShapeStore, ShapeCategory, ShapeLibrary};
use std::path::{Path, PathBuf};

/// Floorplan CLI - edit warehouse layouts from the command line
#[derive(Parser)]
#[command(name = "floorplan")]
#[command(about = "Command-line interface for the floorplan layout editor")]
struct Cli {
    /// Editor config (JSON) with grid steps and defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every item and the location ids in use
    Inspect {
        /// Layout file
        layout: PathBuf,
    },

    /// Apply a JSON list of commands to a layout
    Apply {
        /// Layout file
        layout: PathBuf,

        /// File holding one command or an array of commands
        #[arg(long)]
        commands: PathBuf,

        /// Item to select before the first command
        #[arg(long)]
        select: Option<String>,

        /// Where to write the result (default: overwrite the layout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Run the commands without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a single JSON query against a layout
    Query {
        /// Layout file
        layout: PathBuf,

        /// JSON query to execute
        json: String,
    },

    /// List placeable shapes
    Shapes {
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only shapes in this category
        #[arg(long)]
        category: Option<ShapeCategory>,

        /// Custom shape store (JSON)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Add a custom shape to a shape store
    AddShape {
        /// Custom shape store (JSON)
        #[arg(long)]
        store: PathBuf,

        #[arg(long)]
        name: String,

        /// SVG path data
        #[arg(long)]
        path: String,

        #[arg(long, default_value_t = 60.0)]
        width: f32,

        #[arg(long, default_value_t = 60.0)]
        height: f32,
    },

    /// Normalize a color the way the editor stores it
    Color {
        value: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Inspect { layout } => inspect(&layout),
        Commands::Apply {
            layout,
            commands,
            select,
            out,
            dry_run,
        } => apply(config, &layout, &commands, select.as_deref(), out, dry_run),
        Commands::Query { layout, json } => query(config, &layout, &json),
        Commands::Shapes {
            search,
            category,
            store,
        } => list_shapes(&search, category, store),
        Commands::AddShape {
            store,
            name,
            path,
            width,
            height,
        } => add_shape(store, name, path, width, height),
        Commands::Color { value } => {
            println!("{}", normalize_hex_color(&value));
            Ok(())
        }
    }
}

fn open_layout(path: &Path) -> Result<Scene> {
    let document = LayoutDocument::load(path).with_context(|| format!("Failed to read layout {}", path.display()))?;
    Scene::from_document(document).with_context(|| format!("Layout {} is inconsistent", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print all items and the location ids they hold.
fn inspect(layout: &Path) -> Result<()> {
    let scene = open_layout(layout)?;
    let editor = PropertiesEditor::default();
    print_json(&execute_query(&scene, &editor, Query::GetAllItems))?;
    print_json(&execute_query(&scene, &editor, Query::GetLocationIds))
}

/// Read commands from a file. A bare command and an array are both accepted.
fn read_commands(path: &Path) -> Result<Vec<Command>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&json).with_context(|| "Invalid command JSON")?;
    let commands = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        _ => vec![serde_json::from_value(value)?],
    };
    Ok(commands)
}

fn apply(
    config: EditorConfig,
    layout: &Path,
    commands: &Path,
    select: Option<&str>,
    out: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let mut scene = open_layout(layout)?;
    let commands = read_commands(commands)?;
    let mut editor = PropertiesEditor::new(config);
    let mut notifier = LogNotifier;

    if let Some(raw) = select {
        let Some(id) = ItemId::parse(raw) else {
            bail!("Invalid item id: {raw}");
        };
        if scene.get_item(id).is_none() {
            bail!("No item {raw} in {}", layout.display());
        }
        scene.select(Some(id));
    }

    let mut failures = 0;
    for command in commands {
        let result = execute_command(&mut scene, &mut editor, &mut notifier, command);
        if matches!(result, CommandResult::Error { .. } | CommandResult::Rejected { .. }) {
            failures += 1;
        }
        print_json(&result)?;
    }
    log::info!("{} events", scene.take_events().len());

    if dry_run {
        return Ok(());
    }
    let target = out.unwrap_or_else(|| layout.to_path_buf());
    scene
        .to_document()
        .save(&target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    if failures > 0 {
        eprintln!("{failures} command(s) were not applied");
    }
    Ok(())
}

fn query(config: EditorConfig, layout: &Path, json: &str) -> Result<()> {
    let scene = open_layout(layout)?;
    let query: Query = serde_json::from_str(json).with_context(|| "Invalid query JSON")?;
    let editor = PropertiesEditor::new(config);
    print_json(&execute_query(&scene, &editor, query))
}

fn load_library(store: Option<&Path>) -> Result<ShapeLibrary> {
    match store {
        Some(path) => Ok(ShapeLibrary::load(&JsonShapeStore::new(path))?),
        None => Ok(ShapeLibrary::with_builtins()),
    }
}

fn list_shapes(search: &str, category: Option<ShapeCategory>, store: Option<PathBuf>) -> Result<()> {
    let library = load_library(store.as_deref())?;
    let shapes = library.search(search, category);
    if shapes.is_empty() {
        println!("No shapes match.");
        return Ok(());
    }
    for shape in shapes {
        let size = shape.default_size;
        println!(
            "{:<18} {:<16} {:<11} {}×{}  {}",
            shape.id,
            shape.name,
            shape.category,
            size.width(),
            size.height(),
            shape.description
        );
    }
    Ok(())
}

fn add_shape(store: PathBuf, name: String, path: String, width: f32, height: f32) -> Result<()> {
    let mut library = load_library(Some(&store))?;
    let mut store = JsonShapeStore::new(store);
    let draft = CustomShapeDraft::new(name, CanvasSize::new(width, height)).with_path(path);
    let shape = library.add_custom(draft, &mut store)?;
    println!("Added {} ({})", shape.name, shape.id);
    Ok(())
}
