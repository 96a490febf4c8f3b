// Output formatting: terminal color helpers and the JSON response/error
// envelopes the CLI wraps its results in.

use std::io::IsTerminal;

pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[1;33m";
pub const CYAN: &str = "\x1b[0;36m";
pub const BOLD: &str = "\x1b[1m";
pub const NC: &str = "\x1b[0m";

/// Check if stdout is a terminal (for color output)
#[inline]
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Print info message
pub fn info(msg: &str) {
    let color = if is_terminal() { GREEN } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    println!("{}[INFO]{} {}", color, reset, msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    let color = if is_terminal() { YELLOW } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    eprintln!("{}[WARN]{} {}", color, reset, msg);
}

/// Print error message
pub fn error(msg: &str) {
    let color = if is_terminal() { RED } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    eprintln!("{}[ERROR]{} {}", color, reset, msg);
}

/// Print section header
pub fn header(msg: &str) {
    let bold = if is_terminal() { BOLD } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    println!("{}===>{} {}", bold, reset, msg);
    println!();
}

/// Print a diagnostic line: `line:N: message`, colored cyan when the
/// terminal supports it.
pub fn diagnostic(line: u32, message: &str) {
    let color = if is_terminal() { CYAN } else { "" };
    let reset = if is_terminal() { NC } else { "" };
    println!("{}line {}:{} {}", color, line, reset, message);
}

/// Error codes for JSON error responses.
pub const E_MALFORMED_CFG: &str = "E001";
pub const E_INVALID_INPUT: &str = "E002";
pub const E_FILE_NOT_FOUND: &str = "E003";

/// Common remediation messages.
pub const R_HINT_CFG_SHAPE: &str = "Blocks must be index-aligned with their id and terminator targets must exist";
pub const R_HINT_FIXTURE_FORMAT: &str = "See the `CfgProgram` JSON shape documented in the crate's schema";

/// JSON output wrapper, one envelope per invocation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JsonResponse<T> {
    pub schema_version: String,
    pub execution_id: String,
    pub tool: String,
    pub timestamp: String,
    pub data: T,
}

impl<T: serde::Serialize> JsonResponse<T> {
    pub fn new(data: T) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = chrono::Utc::now().to_rfc3339();
        let exec_id = format!(
            "{:x}-{}",
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs(),
            std::process::id()
        );

        JsonResponse {
            schema_version: "1.0.0".to_string(),
            execution_id: exec_id,
            tool: "nullwalk".to_string(),
            timestamp,
            data,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Error response format for JSON mode.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl JsonError {
    pub fn new(category: &str, message: &str, code: &str) -> Self {
        JsonError { error: category.to_string(), message: message.to_string(), code: code.to_string(), remediation: None }
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }

    /// The CFG fixture failed `build_cfg`'s structural validation.
    pub fn malformed_cfg(detail: &str) -> Self {
        Self::new("MalformedCfg", &format!("malformed CFG: {}", detail), E_MALFORMED_CFG)
            .with_remediation(R_HINT_CFG_SHAPE)
    }

    /// The input file isn't valid JSON, or doesn't match `CfgProgram`.
    pub fn invalid_input(detail: &str) -> Self {
        Self::new("InvalidInput", &format!("invalid input: {}", detail), E_INVALID_INPUT)
            .with_remediation(R_HINT_FIXTURE_FORMAT)
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::new("FileNotFound", &format!("file not found: {}", path), E_FILE_NOT_FOUND)
    }
}
