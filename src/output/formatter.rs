use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::namespace::NamespaceMapping;

#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub count: usize,
    pub types: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<NamespaceMapping>,
}

pub struct OutputFormatter;

impl OutputFormatter {
    /// Renders discovered names. `namespaces` is only included in JSON
    /// output, and only when non-empty.
    pub fn format(
        types: &[String],
        namespaces: Vec<NamespaceMapping>,
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Plain => Ok(types
                .iter()
                .map(|name| format!("{name}\n"))
                .collect()),
            OutputFormat::Json => {
                let output = JsonOutput {
                    count: types.len(),
                    types,
                    namespaces,
                };
                Ok(serde_json::to_string_pretty(&output)?)
            }
        }
    }
}
