//! Dialects command implementation.

use crate::config::Config;
use serde::Serialize;
use vnlz_lzss::{Dialect, DialectTable};

#[derive(Serialize)]
struct DialectInfo<'a> {
    tag: &'a str,
    aliases: &'a [&'a str],
    description: &'a str,
    source: &'static str,
    table: &'a DialectTable,
}

pub fn cmd_dialects(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut infos: Vec<DialectInfo<'_>> = config
        .dialects
        .iter()
        .map(|table| DialectInfo {
            tag: &table.name,
            aliases: &[],
            description: "",
            source: "config",
            table,
        })
        .collect();
    infos.extend(Dialect::ALL.iter().map(|d| DialectInfo {
        tag: d.tag(),
        aliases: d.aliases(),
        description: d.description(),
        source: "builtin",
        table: d.table(),
    }));

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!(
        "{:<16} {:>8} {:>8} {:>6}  Description",
        "Tag", "Frame", "Cursor", "Max"
    );
    println!("{}", "-".repeat(72));
    for info in &infos {
        let mut description = if info.source == "config" {
            "(from config)".to_string()
        } else {
            info.description.to_string()
        };
        if !info.aliases.is_empty() {
            description.push_str(&format!(" [aliases: {}]", info.aliases.join(", ")));
        }
        println!(
            "{:<16} {:>#8x} {:>#8x} {:>6}  {}",
            info.tag,
            info.table.frame_size,
            info.table.initial_cursor,
            info.table.max_match(),
            description
        );
    }

    Ok(())
}
