//! The Configuration Loader (C4): layered resolution with no caching
//! between processes, using the `config` crate the same way the teacher
//! layers its own settings sources.

use serde::{Deserialize, Serialize};

use crate::git::Repository;

pub const DEFAULT_THRESHOLD: u32 = 600;
pub const DEFAULT_VIEW_MODE: &str = "tree";
const MIN_THRESHOLD: u32 = 50;
const MAX_THRESHOLD: u32 = 2000;

/// The resolved, ephemeral configuration for one handler invocation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default = "default_view_mode")]
    pub default_view_mode: String,
    #[serde(default)]
    pub default_view_opts: String,
    #[serde(default = "default_true")]
    pub show_diff_viz: bool,
}

fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

fn default_view_mode() -> String {
    DEFAULT_VIEW_MODE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            default_view_mode: default_view_mode(),
            default_view_opts: String::new(),
            show_diff_viz: true,
        }
    }
}

/// `threshold ∈ {0} ∪ [50, 2000]`.
pub fn is_valid_threshold(threshold: u32) -> bool {
    threshold == 0 || (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&threshold)
}

const PRIVATE_CONFIG_FILE: &str = "bumper-config.json";

/// Resolve effective configuration: tracked repo file, then private
/// per-worktree override, then built-in defaults — first hit wins,
/// per-field (a layer missing a key falls through to the next layer's
/// value for that key, via serde's `#[serde(default)]` on each field).
///
/// Malformed JSON at any layer is treated as "this layer contributes
/// nothing" rather than propagated — §7's `ConfigInvalid` / `StateCorrupt`
/// policy.
pub fn resolve(repo: &Repository) -> ResolvedConfig {
    let mut builder = config::Config::builder()
        .set_default("threshold", DEFAULT_THRESHOLD as i64)
        .and_then(|b| b.set_default("default_view_mode", DEFAULT_VIEW_MODE))
        .and_then(|b| b.set_default("default_view_opts", ""))
        .and_then(|b| b.set_default("show_diff_viz", true))
        .unwrap_or_else(|_| config::Config::builder());

    if let Ok(private_path) = private_config_path(repo) {
        builder = builder.add_source(
            config::File::from(private_path)
                .format(config::FileFormat::Json)
                .required(false),
        );
    }

    if let Ok(tracked_path) = repo.tracked_config_path() {
        builder = builder.add_source(
            config::File::from(tracked_path)
                .format(config::FileFormat::Json)
                .required(false),
        );
    }

    match builder.build().and_then(|c| c.try_deserialize()) {
        Ok(resolved) => sanitize(resolved),
        Err(e) => {
            log::warn!("configuration could not be resolved, using defaults: {e}");
            ResolvedConfig::default()
        }
    }
}

fn sanitize(mut cfg: ResolvedConfig) -> ResolvedConfig {
    if !is_valid_threshold(cfg.threshold) {
        log::warn!(
            "configured threshold {} is out of range, falling back to default",
            cfg.threshold
        );
        cfg.threshold = DEFAULT_THRESHOLD;
    }
    cfg
}

fn private_config_path(repo: &Repository) -> Result<std::path::PathBuf, crate::git::GitError> {
    repo.git_path(PRIVATE_CONFIG_FILE)
}

/// Persist a new view mode to the private (untracked) config file,
/// preserving whatever else is already there. Used by the `bumper-view
/// <mode>` / `bumper-<mode-name>` slash commands — a personal viewer
/// preference, unlike the threshold, has no business in the tracked file.
pub fn set_private_view_mode(repo: &Repository, view_mode: &str) -> Result<(), crate::error::EngineError> {
    let path = private_config_path(repo)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut value: serde_json::Value = match std::fs::read(&path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::json!({})),
        Err(_) => serde_json::json!({}),
    };
    if let serde_json::Value::Object(ref mut map) = value {
        map.insert("default_view_mode".to_string(), serde_json::json!(view_mode));
    }
    std::fs::write(&path, serde_json::to_vec_pretty(&value)?)?;
    Ok(())
}

/// Persist a new threshold to the tracked config file, preserving whatever
/// else is already there (forward-compatible unknown-key round trip).
/// Used by the `bumper-config <n>` slash command.
pub fn set_tracked_threshold(repo: &Repository, threshold: u32) -> Result<(), crate::error::EngineError> {
    if !is_valid_threshold(threshold) {
        return Err(crate::error::EngineError::ConfigInvalid(format!(
            "threshold {threshold} must be 0 or in the range 50..=2000"
        )));
    }

    let path = repo.tracked_config_path()?;
    let mut value: serde_json::Value = match std::fs::read(&path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::json!({})),
        Err(_) => serde_json::json!({}),
    };
    if let serde_json::Value::Object(ref mut map) = value {
        map.insert("threshold".to_string(), serde_json::json!(threshold));
    }
    std::fs::write(&path, serde_json::to_vec_pretty(&value)?)?;
    Ok(())
}
