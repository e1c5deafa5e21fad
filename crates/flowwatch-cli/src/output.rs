use std::io::{self, Write};

use flowwatch_core::UtcDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Response wrapper printed on stdout for every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub generated_at: UtcDateTime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            generated_at: UtcDateTime::now(),
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Writes the envelope to stdout.
pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json if pretty => serde_json::to_writer_pretty(&mut out, envelope)?,
        OutputFormat::Json => serde_json::to_writer(&mut out, envelope)?,
        OutputFormat::Table => write_summary(&mut out, envelope)?,
    }
    writeln!(out)?;
    Ok(())
}

/// One `key: value` line per top-level data field; arrays are summarized
/// by length and nested objects printed as compact JSON.
fn write_summary(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "{:<14}{}", "request", envelope.meta.request_id)?;
    writeln!(out, "{:<14}{}", "generated", envelope.meta.generated_at)?;
    for warning in &envelope.meta.warnings {
        writeln!(out, "{:<14}{warning}", "warning")?;
    }

    match &envelope.data {
        Value::Object(fields) => {
            for (key, value) in fields {
                let shown = match value {
                    Value::Array(items) => format!("[{} items]", items.len()),
                    Value::String(text) => text.clone(),
                    other => serde_json::to_string(other)?,
                };
                write!(out, "\n{key:<14}{shown}")?;
            }
        }
        other => write!(out, "\n{}", serde_json::to_string_pretty(other)?)?,
    }
    Ok(())
}
