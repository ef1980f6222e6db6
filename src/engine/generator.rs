use crate::engine::assembler::FlagValues;
use crate::engine::builder::{CommandSchema, FlagKind, FlagSpec};
use crate::error::Error;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};

/// Converts a String to a 'static str by leaking it
///
/// This is necessary for clap's API which requires 'static strings.
/// In a CLI context, this is acceptable as the program runs once and exits.
fn to_static_str(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

/// Generates the clap command parsing the flags of one operation
///
/// Every flag takes a string value; coercion and required checks happen in
/// the assembler so that all missing flags are reported together.
#[must_use]
pub fn generate_operation_command(schema: &CommandSchema) -> Command {
    let name = to_static_str(schema.operation_id.clone());
    let mut command = Command::new(name)
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true);

    for flag in schema.flags.values() {
        command = command.arg(create_arg_from_flag(flag));
    }

    command
}

fn create_arg_from_flag(flag: &FlagSpec) -> Arg {
    let name = to_static_str(flag.name.clone());
    let mut arg = Arg::new(name)
        .long(name)
        .value_name(flag.kind.type_name())
        .required(false)
        .action(ArgAction::Set);

    if let Some(description) = &flag.description {
        arg = arg.help(description.clone());
    }

    if flag.kind == FlagKind::Boolean {
        arg = arg.num_args(0..=1).default_missing_value("true");
    }

    if !flag.kind.is_list() {
        if let Some(values) = &flag.enumeration {
            let choices: Vec<&'static str> =
                values.iter().map(|v| to_static_str(v.to_string())).collect();
            arg = arg.value_parser(PossibleValuesParser::new(choices));
        }
    }

    arg
}

/// Rewrites single-dash long flags into the double-dash form clap expects
///
/// `-name=value` becomes `--name=value` and `-force` becomes `--force`. A flag
/// that takes a value and is written without `=` is joined with the next
/// token, so `-sort -created-at` becomes `--sort=-created-at`. Everything after
/// a bare `--` is left untouched.
#[must_use]
pub fn normalize_args(schema: &CommandSchema, args: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(args.len());
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            normalized.push(arg.clone());
            normalized.extend(iter.cloned());
            break;
        }

        match long_flag(arg) {
            Some(name) if !name.contains('=') && takes_value(schema, name) => {
                match iter.next() {
                    Some(value) => normalized.push(format!("--{name}={value}")),
                    None => normalized.push(format!("--{name}")),
                }
            }
            Some(flag) => normalized.push(format!("--{flag}")),
            None => normalized.push(arg.clone()),
        }
    }

    normalized
}

/// Flag text after its dashes; values such as `-5` or `-` are not flags
fn long_flag(arg: &str) -> Option<&str> {
    let rest = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    rest.chars()
        .next()
        .is_some_and(char::is_alphabetic)
        .then_some(rest)
}

fn takes_value(schema: &CommandSchema, name: &str) -> bool {
    schema
        .flags
        .get(name)
        .is_some_and(|flag| flag.kind != FlagKind::Boolean)
}

/// Parses the arguments following the command name into raw flag values
///
/// # Errors
/// Returns `Usage` for unknown flags, missing values or values outside an
/// enumeration.
pub fn parse_flag_values(schema: &CommandSchema, args: &[String]) -> Result<FlagValues, Error> {
    let matches = generate_operation_command(schema)
        .try_get_matches_from(normalize_args(schema, args))
        .map_err(|e| Error::Usage(e.render().to_string().trim().to_string()))?;

    let mut values = FlagValues::new();
    for name in schema.flags.keys() {
        if let Ok(Some(value)) = matches.try_get_one::<String>(name) {
            values.insert(name.clone(), value.clone());
        }
    }
    Ok(values)
}
