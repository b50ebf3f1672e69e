use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use designbot_core::catalog::CatalogTag;
use toml::Value;

use crate::commands::load_config;

pub fn run(config_path: Option<PathBuf>) -> String {
    let config = match load_config(config_path.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = config_path.or_else(detect_config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<built-in>".to_string());
    lines.push(render_line(
        "catalog.path",
        &catalog_path,
        source("catalog.path", &["DESIGNBOT_CATALOG_PATH"]),
    ));

    lines.push(render_line(
        "dialogue.default_material",
        config.dialogue.default_material.tag(),
        source("dialogue.default_material", &["DESIGNBOT_DEFAULT_MATERIAL"]),
    ));
    lines.push(render_line(
        "dialogue.default_color",
        config.dialogue.default_color.tag(),
        source("dialogue.default_color", &["DESIGNBOT_DEFAULT_COLOR"]),
    ));
    lines.push(render_line(
        "dialogue.default_dimension",
        config.dialogue.default_dimension.tag(),
        source("dialogue.default_dimension", &["DESIGNBOT_DEFAULT_DIMENSION"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["DESIGNBOT_LOGGING_LEVEL", "DESIGNBOT_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["DESIGNBOT_LOGGING_FORMAT", "DESIGNBOT_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("designbot.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/designbot.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
