use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use dashvtk_scene::{BuildOptions, DEFAULT_NAMESPACE, SerializeOptions, UnknownPropertyPolicy};
use log::{LevelFilter, debug, info};
use thiserror::Error;
use toml::Value;

pub const CONFIG_FILE: &str = "dashvtk.toml";
pub const DEFAULT_MAIN_SCENE: &str = "scenes/main.vtks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSettings {
    /// Dash namespace written on every component.
    pub namespace: String,
    pub unknown_properties: UnknownPropertyPolicy,
    pub include_defaults: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            unknown_properties: UnknownPropertyPolicy::Reject,
            include_defaults: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    /// Scene built when the CLI gets no path, relative to the project root.
    pub main_scene: String,
    pub scene: SceneSettings,
    pub pretty: bool,
    pub log_level: LevelFilter,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::default_for_name("dashvtk")
    }
}

impl ProjectConfig {
    pub fn default_for_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main_scene: DEFAULT_MAIN_SCENE.to_string(),
            scene: SceneSettings::default(),
            pretty: true,
            log_level: LevelFilter::Warn,
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            unknown_properties: self.scene.unknown_properties,
        }
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            namespace: self.scene.namespace.clone(),
            include_defaults: self.scene.include_defaults,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("invalid field `{0}`: {1}")]
    InvalidField(&'static str, String),
    #[error("project directory already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// Scaffolds a project directory; refuses to touch an existing one.
pub fn create_new_project(project_root: &Path, project_name: &str) -> Result<(), ProjectError> {
    if project_root.exists() {
        return Err(ProjectError::AlreadyExists(project_root.to_path_buf()));
    }
    let scenes = project_root.join("scenes");
    fs::create_dir_all(&scenes)?;
    fs::write(project_root.join(CONFIG_FILE), default_config_toml(project_name))?;
    fs::write(
        project_root.join(DEFAULT_MAIN_SCENE),
        default_main_scene(&slug_from_project_name(project_name)),
    )?;
    fs::write(project_root.join(".gitignore"), "out/\n")?;
    info!("created project `{project_name}` at {}", project_root.display());
    Ok(())
}

/// Project-relative paths resolve against `root`; absolute ones stay as they are.
pub fn resolve_project_path(input: &str, root: &Path) -> PathBuf {
    let path = Path::new(input);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Nearest `dashvtk.toml` in `start` or one of its ancestors.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Reads a config file; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<ProjectConfig, ProjectError> {
    if !path.exists() {
        debug!("{} not found, using defaults", path.display());
        return Ok(ProjectConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    let config = parse_config_toml(&contents)?;
    debug!("loaded {} for project `{}`", path.display(), config.name);
    Ok(config)
}

pub fn default_config_toml(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
main_scene = "{DEFAULT_MAIN_SCENE}"

[scene]
namespace = "{DEFAULT_NAMESPACE}"
unknown_properties = "reject"
include_defaults = true

[output]
pretty = true

[log]
level = "warn"
"#
    )
}

fn table<'a>(value: &'a Value, key: &'static str) -> Result<Option<&'a toml::Table>, ProjectError> {
    match value.get(key) {
        None => Ok(None),
        Some(Value::Table(t)) => Ok(Some(t)),
        Some(_) => Err(ProjectError::InvalidField(key, "must be a table".to_string())),
    }
}

fn string_field(
    table: Option<&toml::Table>,
    key: &str,
    field: &'static str,
) -> Result<Option<String>, ProjectError> {
    match table.and_then(|t| t.get(key)) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ProjectError::InvalidField(field, "must be a string".to_string())),
    }
}

fn bool_field(
    table: Option<&toml::Table>,
    key: &str,
    field: &'static str,
) -> Result<Option<bool>, ProjectError> {
    match table.and_then(|t| t.get(key)) {
        None => Ok(None),
        Some(Value::Boolean(b)) => Ok(Some(*b)),
        Some(_) => Err(ProjectError::InvalidField(field, "must be true or false".to_string())),
    }
}

/// Parses `dashvtk.toml`. Every table and key is optional.
pub fn parse_config_toml(contents: &str) -> Result<ProjectConfig, ProjectError> {
    let value: Value = contents.parse::<Value>()?;
    let mut config = ProjectConfig::default();

    let project = table(&value, "project")?;
    if let Some(name) = string_field(project, "name", "project.name")? {
        config.name = name;
    }
    if let Some(main_scene) = string_field(project, "main_scene", "project.main_scene")? {
        if main_scene.trim().is_empty() {
            return Err(ProjectError::InvalidField(
                "project.main_scene",
                "must not be empty".to_string(),
            ));
        }
        config.main_scene = main_scene;
    }

    let scene = table(&value, "scene")?;
    if let Some(namespace) = string_field(scene, "namespace", "scene.namespace")? {
        config.scene.namespace = namespace;
    }
    if let Some(policy) = string_field(scene, "unknown_properties", "scene.unknown_properties")? {
        config.scene.unknown_properties = parse_policy(&policy)?;
    }
    if let Some(include) = bool_field(scene, "include_defaults", "scene.include_defaults")? {
        config.scene.include_defaults = include;
    }

    let output = table(&value, "output")?;
    if let Some(pretty) = bool_field(output, "pretty", "output.pretty")? {
        config.pretty = pretty;
    }

    let log = table(&value, "log")?;
    if let Some(level) = string_field(log, "level", "log.level")? {
        config.log_level = LevelFilter::from_str(level.trim()).map_err(|_| {
            ProjectError::InvalidField(
                "log.level",
                format!("`{level}` is not one of off, error, warn, info, debug, trace"),
            )
        })?;
    }

    Ok(config)
}

fn parse_policy(raw: &str) -> Result<UnknownPropertyPolicy, ProjectError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "reject" => Ok(UnknownPropertyPolicy::Reject),
        "passthrough" => Ok(UnknownPropertyPolicy::Passthrough),
        _ => Err(ProjectError::InvalidField(
            "scene.unknown_properties",
            format!("`{raw}` is not one of reject, passthrough"),
        )),
    }
}

/// Lower-case identifier safe to use as a component id prefix.
fn slug_from_project_name(project_name: &str) -> String {
    let mapped: String = project_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = mapped.trim_matches('-');
    if trimmed.is_empty() {
        "scene".to_string()
    } else {
        trimmed.to_string()
    }
}

fn default_main_scene(slug: &str) -> String {
    format!(
        r#"# Edit and run `dashvtk build {DEFAULT_MAIN_SCENE}`
[View]
    id = "{slug}-view"
    [GeometryRepresentation]
        property = {{ edgeVisibility = true }}
        [Algorithm]
            vtkClass = "vtkConeSource"
            state = {{ resolution = 64, height = 1.5 }}
        [/Algorithm]
    [/GeometryRepresentation]
[/View]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashvtk_scene::{SourceFormat, load_scene};

    #[test]
    fn parse_config_reads_all_sections() {
        let toml = r#"
[project]
name = "Demo"
main_scene = "scenes/cone.vtks"

[scene]
namespace = "my_vtk"
unknown_properties = "passthrough"
include_defaults = false

[output]
pretty = false

[log]
level = "debug"
"#;

        let parsed = parse_config_toml(toml).expect("failed to parse dashvtk.toml");
        assert_eq!(parsed.name, "Demo");
        assert_eq!(parsed.main_scene, "scenes/cone.vtks");
        assert_eq!(parsed.scene.namespace, "my_vtk");
        assert_eq!(parsed.scene.unknown_properties, UnknownPropertyPolicy::Passthrough);
        assert!(!parsed.scene.include_defaults);
        assert!(!parsed.pretty);
        assert_eq!(parsed.log_level, LevelFilter::Debug);

        assert_eq!(
            parsed.build_options(),
            BuildOptions {
                unknown_properties: UnknownPropertyPolicy::Passthrough
            }
        );
        assert_eq!(parsed.serialize_options().namespace, "my_vtk");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let parsed = parse_config_toml("[output]\npretty = false\n").unwrap();
        assert_eq!(parsed.scene, SceneSettings::default());
        assert_eq!(parsed.main_scene, DEFAULT_MAIN_SCENE);
        assert_eq!(parsed.log_level, LevelFilter::Warn);
        assert!(!parsed.pretty);

        assert_eq!(parse_config_toml("").unwrap(), ProjectConfig::default());
    }

    #[test]
    fn parse_config_rejects_bad_values() {
        let err = parse_config_toml("[scene]\nunknown_properties = \"ignore\"\n").unwrap_err();
        assert!(matches!(
            err,
            ProjectError::InvalidField("scene.unknown_properties", _)
        ));

        let err = parse_config_toml("[log]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ProjectError::InvalidField("log.level", _)));

        let err = parse_config_toml("[output]\npretty = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ProjectError::InvalidField("output.pretty", _)));

        let err = parse_config_toml("scene = 3\n").unwrap_err();
        assert!(matches!(err, ProjectError::InvalidField("scene", _)));

        assert!(matches!(
            parse_config_toml("[scene"),
            Err(ProjectError::ParseToml(_))
        ));
    }

    #[test]
    fn default_toml_round_trips() {
        let parsed = parse_config_toml(&default_config_toml("Demo")).unwrap();
        assert_eq!(parsed, ProjectConfig::default_for_name("Demo"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn new_project_scaffolds_buildable_scene() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("My Viewer");
        create_new_project(&root, "My Viewer").unwrap();

        let config = load_config(&root.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.name, "My Viewer");

        let scene_path = resolve_project_path(&config.main_scene, &root);
        let src = fs::read_to_string(&scene_path).unwrap();
        let scene = load_scene(&src, SourceFormat::Vtks, &config.build_options()).unwrap();
        assert_eq!(scene.root().id(), Some("my-viewer-view"));

        assert_eq!(find_config(&root.join("scenes")), Some(root.join(CONFIG_FILE)));

        let err = create_new_project(&root, "again").unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn slug_normalizes_names() {
        assert_eq!(slug_from_project_name("My Project!"), "my-project");
        assert_eq!(slug_from_project_name("__"), "scene");
    }
}
