//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docket_domain::{ExtractionItem, FieldSet, ItemStatus, Role};
use docket_extractor::BatchReport;
use docket_summary::{ExportTable, ResolvedRoles};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format extraction items with one column per field.
    pub fn format_items(&self, items: &[ExtractionItem], fields: &FieldSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = items
                    .iter()
                    .map(|item| {
                        let data = item.data().map(|record| {
                            record
                                .iter()
                                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                                .collect::<serde_json::Map<_, _>>()
                        });
                        serde_json::json!({
                            "id": item.id().to_string(),
                            "fileName": item.file_name(),
                            "status": item.status().as_str(),
                            "data": data,
                            "error": item.error(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => Ok(self.format_items_table(items, fields)),
            OutputFormat::Quiet => Ok(items
                .iter()
                .map(|i| format!("{} {}", i.id(), i.status()))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_items_table(&self, items: &[ExtractionItem], fields: &FieldSet) -> String {
        if items.is_empty() {
            return self.colorize("No items.", "yellow");
        }

        let mut builder = Builder::default();
        let header: Vec<String> = ["ID", "File", "Status"]
            .into_iter()
            .map(str::to_string)
            .chain(fields.iter().map(str::to_string))
            .collect();
        builder.push_record(header);

        for item in items {
            let id = item.id().to_string();
            let mut row = vec![
                id[..8].to_string(), // Truncate ID for readability
                item.file_name().to_string(),
                self.status(item.status()),
            ];
            match (item.data(), item.error()) {
                (Some(data), _) => {
                    row.extend(fields.iter().map(|f| data.get(f).map(|v| v.to_string()).unwrap_or_default()));
                }
                (None, Some(message)) => {
                    row.push(self.colorize(message, "red"));
                    row.extend(fields.iter().skip(1).map(|_| String::new()));
                }
                (None, None) => row.extend(fields.iter().map(|_| String::new())),
            }
            builder.push_record(row);
        }

        self.render(builder)
    }

    /// Format an export table (summary rows or item rows).
    pub fn format_table(&self, table: &ExportTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Map<String, serde_json::Value>> = table
                    .rows
                    .iter()
                    .map(|row| {
                        table
                            .headers
                            .iter()
                            .cloned()
                            .zip(row.iter().cloned().map(serde_json::Value::String))
                            .collect()
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(table.headers.clone());
                for row in &table.rows {
                    builder.push_record(row.clone());
                }
                Ok(self.render(builder))
            }
            OutputFormat::Quiet => Ok(table
                .rows
                .iter()
                .filter_map(|row| row.first().cloned())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format which field each role resolved to.
    pub fn format_roles(&self, roles: &ResolvedRoles, fields: &FieldSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = Role::ALL
                    .iter()
                    .map(|role| {
                        let field = roles
                            .get(*role)
                            .map(|f| serde_json::Value::String(f.to_string()))
                            .unwrap_or(serde_json::Value::Null);
                        (role.as_str().to_string(), field)
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "fields": fields.names(),
                    "roles": map,
                }))?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Role", "Field"]);
                for role in Role::ALL {
                    let field = match roles.get(role) {
                        Some(f) => f.to_string(),
                        None => self.colorize("-", "yellow"),
                    };
                    builder.push_record([role.label().to_string(), field]);
                }
                Ok(format!(
                    "Fields: {}\n{}",
                    fields.names().join(", "),
                    self.render(builder)
                ))
            }
            OutputFormat::Quiet => Ok(fields.names().join("\n")),
        }
    }

    /// Format a batch report line.
    pub fn batch_report(&self, report: &BatchReport) -> String {
        if report.failed == 0 && !report.superseded {
            self.success(&report.summary())
        } else {
            self.warning(&report.summary())
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an item status.
    pub fn status(&self, status: ItemStatus) -> String {
        let color = match status {
            ItemStatus::Success => "green",
            ItemStatus::Error => "red",
            ItemStatus::Processing => "cyan",
            ItemStatus::Pending => "",
        };
        self.colorize(status.as_str(), color)
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
