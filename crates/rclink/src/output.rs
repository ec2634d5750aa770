use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    command: &'a str,
    params: Vec<&'a str>,
    identity: &'a str,
    timestamp: String,
}

/// Render one received command message.
pub fn print_message(message: &str, identity: &str, format: OutputFormat) {
    let mut parts = message.split_whitespace();
    let command = parts.next().unwrap_or("");
    let params: Vec<&str> = parts.collect();

    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                command,
                params,
                identity,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "PARAMS", "IDENTITY"])
                .add_row(vec![
                    command.to_string(),
                    params.join(" "),
                    identity.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "identity={} command={} params={}",
                identity,
                command,
                params.join(" ")
            );
        }
        OutputFormat::Raw => {
            println!("{message}");
        }
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
