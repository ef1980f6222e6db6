use crate::config::Context;
use crate::engine::assembler::{apply_default_account, assemble, BodySource};
use crate::engine::builder::{build_command_schema, BuildOptions, CommandSchema};
use crate::engine::generator::parse_flag_values;
use crate::error::Error;
use crate::response::{Endpoint, PageDriver, PagedOutput};
use crate::spec::{Operation, SchemaIndex};
use crate::transport::Transport;

/// One command invocation as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Normalized operation id
    pub command: String,
    /// Flag arguments following the command name
    pub args: Vec<String>,
    /// Request body read from standard input, sent verbatim
    pub raw_body: Option<String>,
}

/// Derives the flag surface of an operation under the context's settings.
///
/// Per-field anomalies are logged as warnings; the affected fields have no flag.
///
/// # Errors
/// Returns `DuplicateFlag` when two fields shorten to the same flag name.
pub fn prepare_command(operation: &Operation, context: &Context) -> Result<CommandSchema, Error> {
    let options = BuildOptions {
        relax_required: context.relaxes_required(&operation.method),
    };
    let schema = build_command_schema(operation, &options)?;
    for diagnostic in &schema.diagnostics {
        tracing::warn!(operation = %operation.id, "{diagnostic}");
    }
    Ok(schema)
}

/// Runs an invocation end to end: flags, request assembly, paging.
///
/// Nothing is sent unless every required flag is present and every value
/// parses.
///
/// # Errors
/// - `UnknownCommand` when the operation does not exist
/// - `Usage`, `MissingRequiredFlags` or `InvalidFlagValue` for bad input
/// - `Config` when hostname or token are missing
/// - `RemoteError`, `Network` or `MalformedResponse` from the paging driver
pub fn execute<T: Transport + ?Sized>(
    index: &SchemaIndex,
    context: &Context,
    transport: &T,
    invocation: &Invocation,
) -> Result<PagedOutput, Error> {
    let operation = index.operation(&invocation.command)?;
    let schema = prepare_command(operation, context)?;

    let mut values = parse_flag_values(&schema, &invocation.args)?;
    apply_default_account(&schema, &mut values, context.account.as_deref());

    let body_source = match &invocation.raw_body {
        Some(body) if schema.has_body && !body.trim().is_empty() => BodySource::Raw(body.clone()),
        _ => BodySource::Flags,
    };
    let request = assemble(&schema, &values, body_source)?;

    let endpoint = Endpoint {
        base_url: context.api_url()?,
        headers: context.auth_headers()?,
    };
    tracing::debug!(operation = %operation.id, method = %request.method, path = %request.path, "executing");
    PageDriver::new(transport, context.page_size).run(&request, &endpoint)
}
