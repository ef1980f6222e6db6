use clap::Parser;
use scalr_cli::cache::SchemaCache;
use scalr_cli::cli::errors::print_error_with_json;
use scalr_cli::cli::tracing_init::init_tracing;
use scalr_cli::cli::Cli;
use scalr_cli::config::{load_context, Context};
use scalr_cli::docs;
use scalr_cli::engine::{execute, prepare_command, Invocation};
use scalr_cli::error::Error;
use scalr_cli::spec::SchemaIndex;
use scalr_cli::transport::{HttpTransport, Transport};
use std::io::{IsTerminal, Read};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);
    let json_errors = cli.json_errors;

    if let Err(e) = run(cli) {
        print_error_with_json(&e, json_errors);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let context = load_context()?;
    let transport = HttpTransport::new(context.timeout)?;
    let index = load_index(&context, &transport, cli.refresh_schema)?;

    if cli.list {
        print!("{}", docs::render_command_list(&index));
        return Ok(());
    }

    if let Some(name) = &cli.describe {
        let operation = index.operation(name)?;
        let schema = prepare_command(operation, &context)?;
        print!("{}", docs::render_command_help(operation, &schema));
        return Ok(());
    }

    let Some(command) = cli.command else {
        if !cli.refresh_schema {
            print!("{}", docs::render_command_list(&index));
        }
        return Ok(());
    };

    let operation = index.operation(&command)?;
    let raw_body = if operation.request_body.is_some() {
        read_stdin_body()?
    } else {
        None
    };

    let invocation = Invocation {
        command,
        args: cli.args,
        raw_body,
    };
    let output = execute(&index, &context, &transport, &invocation)?;
    if let Some(rendered) = output.render()? {
        println!("{rendered}");
    }
    Ok(())
}

fn load_index<T: Transport + ?Sized>(
    context: &Context,
    transport: &T,
    force_refresh: bool,
) -> Result<SchemaIndex, Error> {
    let cache = SchemaCache::for_context(context)?;
    cache.load_index(transport, &context.schema_url()?, force_refresh)
}

/// Request body piped on standard input, if any
fn read_stdin_body() -> Result<Option<String>, Error> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut body = String::new();
    stdin.read_to_string(&mut body)?;
    Ok(Some(body).filter(|body| !body.trim().is_empty()))
}
