//! `dashvtk`: build, check and inspect declarative VTK scenes.
//!
//! - `build`: validate a scene and write its Dash JSON layout
//! - `check`: validate only, reporting the first error with its node path
//! - `schema`: print the property table of a component type
//! - `export`: turn a named DataArray into a CSV download payload
//! - `new`: scaffold a project directory

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dashvtk_download::{DataTable, TableOptions, send_table};
use dashvtk_nodes::{
    Access, ComponentTag, HelperType, NodeSchema, NodeType, helper_schema, node_schema,
};
use dashvtk_project::{
    CONFIG_FILE, ProjectConfig, create_new_project, find_config, load_config,
    resolve_project_path,
};
use dashvtk_scene::{LoadError, Scene, SourceFormat, load_scene};

#[derive(Parser, Debug)]
#[command(name = "dashvtk")]
#[command(about = "Validate and serialize declarative VTK scenes", long_about = None)]
struct Cli {
    /// Config file; defaults to the nearest dashvtk.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a scene and write its JSON layout
    Build(BuildArgs),
    /// Validate a scene without writing anything
    Check(CheckArgs),
    /// Print the properties of a node or helper type
    Schema(SchemaArgs),
    /// Export a DataArray as a CSV download payload
    Export(ExportArgs),
    /// Create a new project directory
    New(NewArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Scene file (.vtks or .json); defaults to the project's main scene
    scene: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Single-line JSON regardless of the config
    #[arg(long)]
    compact: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    scene: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    /// Component tag such as `PolyData` or `Mesh`; lists all tags when omitted
    tag: Option<String>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    scene: PathBuf,

    /// `name` of the DataArray to export
    #[arg(short, long)]
    array: String,

    /// Download filename; defaults to `<array>.csv`
    #[arg(long)]
    filename: Option<String>,

    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Prepend a row index column
    #[arg(long)]
    index: bool,

    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Directory to create
    path: PathBuf,

    /// Project name; defaults to the directory name
    #[arg(long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (config, project_root) = resolve_config(cli.config.as_deref(), &cwd)?;

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_env("RUST_LOG")
        .init();
    info!(
        "project `{}` at {}, unknown properties: {:?}",
        config.name,
        project_root.display(),
        config.scene.unknown_properties
    );

    match cli.command {
        Commands::Build(args) => build_command(args, &config, &project_root),
        Commands::Check(args) => check_command(args, &config, &project_root),
        Commands::Schema(args) => {
            print!("{}", schema_command(args.tag.as_deref())?);
            Ok(())
        }
        Commands::Export(args) => export_command(args, &config),
        Commands::New(args) => new_command(args),
    }
}

/// Explicit `--config`, else the nearest `dashvtk.toml` above `cwd`, else defaults.
fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<(ProjectConfig, PathBuf)> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => find_config(cwd),
    };
    match path {
        Some(path) => {
            let config = load_config(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            Ok((config, root))
        }
        None => Ok((ProjectConfig::default(), cwd.to_path_buf())),
    }
}

fn scene_path(arg: Option<PathBuf>, config: &ProjectConfig, project_root: &Path) -> PathBuf {
    arg.unwrap_or_else(|| resolve_project_path(&config.main_scene, project_root))
}

fn read_scene(path: &Path, config: &ProjectConfig) -> Result<Scene, SceneFailure> {
    let src = std::fs::read_to_string(path).map_err(|err| SceneFailure::Io(err.to_string()))?;
    load_scene(&src, SourceFormat::from_path(path), &config.build_options())
        .map_err(SceneFailure::Load)
}

#[derive(Debug)]
enum SceneFailure {
    Io(String),
    Load(LoadError),
}

impl SceneFailure {
    /// One line: `<node path>: <kind>: <message>` for scene errors.
    fn describe(&self, file: &Path) -> String {
        match self {
            SceneFailure::Io(err) => format!("{}: {err}", file.display()),
            SceneFailure::Load(LoadError::Scene(err)) => {
                let at = err.path().unwrap_or("<root>");
                format!(
                    "{}: {at}: {}: {}",
                    file.display(),
                    err.kind(),
                    err.innermost()
                )
            }
            SceneFailure::Load(err) => format!("{}: {err}", file.display()),
        }
    }
}

fn render_scene(scene: &Scene, config: &ProjectConfig, pretty: bool) -> Result<String> {
    let json = scene.to_json(&config.serialize_options());
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn build_command(args: BuildArgs, config: &ProjectConfig, project_root: &Path) -> Result<()> {
    let path = scene_path(args.scene, config, project_root);
    let scene = read_scene(&path, config).map_err(|f| anyhow!(f.describe(&path)))?;
    info!(
        "built {} nodes from {}, {} shared data sets",
        scene.node_count(),
        path.display(),
        scene.shared().declarations().len()
    );
    for action in scene.post_load_actions() {
        debug!(
            "post-load {} at {}: render={} resetCamera={}",
            action.vtk_class, action.path, action.render, action.reset_camera
        );
    }
    let text = render_scene(&scene, config, config.pretty && !args.compact)?;
    write_output(args.out.as_deref(), &text)
}

fn check_command(args: CheckArgs, config: &ProjectConfig, project_root: &Path) -> Result<()> {
    let path = scene_path(args.scene, config, project_root);
    match read_scene(&path, config) {
        Ok(scene) => {
            println!("{}: ok ({} nodes)", path.display(), scene.node_count());
            Ok(())
        }
        Err(failure) => bail!(failure.describe(&path)),
    }
}

fn schema_command(tag: Option<&str>) -> Result<String> {
    let Some(tag) = tag else {
        let mut out = String::new();
        for ty in NodeType::ALL {
            out.push_str(&format!("{:<24}{:?}\n", ty.as_str(), ty.category()));
        }
        for helper in HelperType::ALL {
            out.push_str(&format!(
                "{:<24}helper -> {}\n",
                helper.as_str(),
                helper.expands_to()
            ));
        }
        return Ok(out);
    };
    let schema = match ComponentTag::from_str(tag)? {
        ComponentTag::Node(ty) => node_schema(ty),
        ComponentTag::Helper(helper) => helper_schema(helper),
    };
    Ok(format_schema(schema))
}

fn format_schema(schema: &NodeSchema) -> String {
    let mut out = format!("{}\n", schema.tag);
    for prop in schema.properties() {
        let mut flags = Vec::new();
        if prop.required {
            flags.push("required".to_string());
        }
        match prop.access {
            Access::Trigger => flags.push("trigger".to_string()),
            Access::ReadOnly => flags.push("read-only".to_string()),
            Access::Normal => {}
        }
        if let Some(group) = prop.group {
            flags.push(format!("exclusive:{group}"));
        }
        let line = format!(
            "  {:<24}{:<18}{:<28}{:<20}{}",
            prop.name,
            prop.domain.expected(),
            prop.default.to_string(),
            flags.join(","),
            prop.doc
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn export_command(args: ExportArgs, config: &ProjectConfig) -> Result<()> {
    let scene = read_scene(&args.scene, config).map_err(|f| anyhow!(f.describe(&args.scene)))?;
    let text = export_array(&scene, &args)?;
    write_output(args.out.as_deref(), &text)
}

fn export_array(scene: &Scene, args: &ExportArgs) -> Result<String> {
    let id = scene
        .find_data_array(&args.array)
        .ok_or_else(|| anyhow!("no DataArray named `{}`", args.array))?;
    let node = scene
        .node(id)
        .ok_or_else(|| anyhow!("dangling node id {id}"))?;
    let table = DataTable::from_data_array(node)?;
    let delimiter = u8::try_from(args.delimiter)
        .map_err(|_| anyhow!("delimiter must be a single byte character"))?;
    let options = TableOptions {
        delimiter,
        index: args.index,
        ..TableOptions::default()
    };
    let filename = args
        .filename
        .clone()
        .unwrap_or_else(|| format!("{}.csv", args.array));
    let payload = send_table(table, filename, options).into_payload()?;
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn new_command(args: NewArgs) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => args
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dashvtk".to_string()),
    };
    create_new_project(&args.path, &name)
        .with_context(|| format!("failed to create project at {}", args.path.display()))?;
    println!(
        "created project `{name}` at {} (config in {CONFIG_FILE})",
        args.path.display()
    );
    Ok(())
}
