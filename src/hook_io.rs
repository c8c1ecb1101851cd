//! JSON request/response shapes for the host's six hook events (spec §6).
//! Field names match the host's wire format exactly; `#[serde(default)]`
//! and optional fields absorb the fact that different events send
//! different subsets.

use serde::Deserialize;

/// Model metadata, present on `status-line` requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub display_name: String,
}

/// Workspace metadata, present on `status-line` requests.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub current_dir: String,
}

/// Cost metadata, present on `status-line` requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostInfo {
    #[serde(default)]
    pub total_cost_usd: f64,
}

/// The union of fields the host may send on any hook event. Each handler
/// only reads the fields its event actually carries (spec §6's table); the
/// rest default to empty/false so one struct can deserialize all six
/// bodies without per-event newtypes.
#[derive(Debug, Clone, Deserialize)]
pub struct HookRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
    #[serde(default)]
    pub stop_hook_active: bool,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: ModelInfo,
    #[serde(default)]
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub cost: CostInfo,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            display_name: String::new(),
        }
    }
}

impl Default for WorkspaceInfo {
    fn default() -> Self {
        Self {
            current_dir: String::new(),
        }
    }
}

/// Read exactly one JSON request object from stdin.
pub fn read_request() -> Result<HookRequest, serde_json::Error> {
    serde_json::from_reader(std::io::stdin())
}

/// `pre-tool-use`'s deny reply: `{hookSpecificOutput:{hookEventName, permissionDecision, permissionDecisionReason}}`.
pub fn pre_tool_use_deny(reason: &str) -> serde_json::Value {
    serde_json::json!({
        "hookSpecificOutput": {
            "hookEventName": "PreToolUse",
            "permissionDecision": "deny",
            "permissionDecisionReason": reason,
        }
    })
}

/// `stop`'s block-the-stop reply: prevents the turn from ending while still
/// letting the assistant keep talking (spec §4.8, §9's "block" terminology
/// note — this is NOT a deny).
pub fn stop_block(reason: &str, system_message: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "continue": true,
        "suppressOutput": true,
        "decision": "block",
        "reason": reason,
    });
    if let Some(msg) = system_message {
        body["systemMessage"] = serde_json::Value::String(msg.to_string());
    }
    body
}

/// A non-blocking `stop` reply carrying only an optional system message.
pub fn stop_allow(system_message: Option<&str>) -> Option<serde_json::Value> {
    system_message.map(|msg| {
        serde_json::json!({
            "continue": true,
            "suppressOutput": true,
            "systemMessage": msg,
        })
    })
}

/// `user-prompt-submit`'s handled reply: `decision:"block"` here means
/// "the engine handled this prompt; do not dispatch it to the LLM" — the
/// inverse sense from the Stop event's "block".
pub fn prompt_handled(reason: &str) -> serde_json::Value {
    serde_json::json!({
        "decision": "block",
        "reason": reason,
    })
}
