use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::diff::diff_json;
use crate::protocol::strip_prefix_noise;

pub enum MessageLogMode {
    Full,
    Diffed,
}

/// Appends bridge traffic to a file, one JSON object per line.
pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    previous: HashMap<String, Value>,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            mode,
            file,
            previous: HashMap::new(),
        })
    }

    pub fn log_request(&mut self, method: &str, resource: &str, body: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "method": method,
            "resource": resource,
            "body": parse_body(body),
        });
        self.write_line(&entry);
    }

    /// Diffed mode compares against the previous response to the same POST,
    /// so the zones and systems polls on `hvac` are tracked separately. Writes
    /// are always logged in full and never remembered.
    pub fn log_response(
        &mut self,
        method: &str,
        resource: &str,
        request: &str,
        status: u16,
        body: &str,
    ) {
        let body = parse_body(strip_prefix_noise(body));
        let diffed = matches!(self.mode, MessageLogMode::Diffed) && method == "POST";
        if !diffed {
            let entry = json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "resp",
                "resource": resource,
                "status": status,
                "body": body,
            });
            self.write_line(&entry);
            return;
        }

        let key = format!("{resource} {request}");
        let entry = match self.previous.get(&key) {
            None => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "resp",
                "resource": resource,
                "status": status,
                "full": true,
                "body": body,
            }),
            Some(prev) => {
                let mut changes = Vec::new();
                diff_json(prev, &body, "", &mut changes);
                let change_entries: Vec<Value> = changes
                    .iter()
                    .map(|(path, old, new)| json!({ "path": path, "old": old, "new": new }))
                    .collect();
                json!({
                    "ts": Utc::now().to_rfc3339(),
                    "dir": "resp",
                    "resource": resource,
                    "status": status,
                    "changes": change_entries,
                })
            }
        };
        self.write_line(&entry);
        self.previous.insert(key, body);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}

fn parse_body(body: &str) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
