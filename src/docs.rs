//! Command listing and per-command help text

use crate::engine::builder::{CommandSchema, FlagSpec};
use crate::spec::{Operation, SchemaIndex};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Inserts a space before every capital letter: `AccessPolicy` becomes `Access Policy`
#[must_use]
pub fn split_group_name(group: &str) -> String {
    let Ok(capitals) = Regex::new("([A-Z])") else {
        return group.to_string();
    };
    capitals
        .replace_all(group, " $1")
        .trim_start()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every command grouped by resource, groups and commands sorted by name
#[must_use]
pub fn render_command_list(index: &SchemaIndex) -> String {
    let mut groups: BTreeMap<String, Vec<&Operation>> = BTreeMap::new();
    for (group, operations) in index.groups() {
        groups
            .entry(split_group_name(group))
            .or_default()
            .extend(operations);
    }

    let mut out = String::from("Usage: scalr [OPTIONS] COMMAND [FLAGS]\n");
    for (group, mut operations) in groups {
        operations.sort_by(|a, b| a.id.cmp(&b.id));
        let width = operations.iter().map(|op| op.id.len()).max().unwrap_or(0);

        let _ = writeln!(out, "\n{group}:");
        for operation in operations {
            let summary = operation.summary.as_deref().unwrap_or_default();
            let _ = writeln!(out, "  {:<width$}  {}", operation.id, one_line(summary));
            trim_trailing(&mut out);
        }
    }
    out
}

/// Usage line, description and sorted flag listing of one command
#[must_use]
pub fn render_command_help(operation: &Operation, schema: &CommandSchema) -> String {
    let mut out = String::new();
    if schema.has_body {
        let _ = writeln!(
            out,
            "Usage: scalr [OPTIONS] {} [FLAGS] [< json-blob.txt]\n",
            operation.id
        );
    } else {
        let _ = writeln!(out, "Usage: scalr [OPTIONS] {} [FLAGS]\n", operation.id);
    }

    let about = operation.about().trim();
    if !about.is_empty() {
        let _ = writeln!(out, "  {}", about.replace('\n', "\n  "));
    }

    if schema.flags.is_empty() {
        return out;
    }

    let mut flags: Vec<&FlagSpec> = schema.flags.values().collect();
    flags.sort_by(|a, b| a.name.cmp(&b.name));
    let usages: Vec<String> = flags.iter().map(|flag| flag_usage(flag)).collect();
    let width = usages.iter().map(String::len).max().unwrap_or(0);

    out.push_str("\nFlags:\n");
    for (flag, usage) in flags.iter().zip(&usages) {
        let mut description = one_line(flag.description.as_deref().unwrap_or_default());
        if flag.required {
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str("[required]");
        }
        let _ = writeln!(out, "  {usage:<width$}  {description}");
        trim_trailing(&mut out);

        if let Some(choices) = &flag.enumeration {
            let choices: Vec<String> = choices.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  {:width$}  [{}]", "", choices.join(", "));
        }
    }
    out
}

fn flag_usage(flag: &FlagSpec) -> String {
    format!("-{}={}", flag.name, flag.kind.type_name())
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drops spaces left by padding before the last newline
fn trim_trailing(out: &mut String) {
    let trimmed = out.trim_end_matches([' ', '\n']).len();
    out.truncate(trimmed);
    out.push('\n');
}
