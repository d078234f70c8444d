//! Error types for the boundary collaborators (parser, CLI, reporter).
//!
//! The core algorithmic modules ([`crate::poly`], [`crate::evaluate`], [`crate::oracle`],
//! [`crate::enumerate`]) are infallible by construction and never return a `Result` — see
//! the module docs on each for why. Everything that touches a file, a CLI flag or user input
//! funnels its failures through the enums here.

use snafu::Snafu;

/// Failures produced while parsing a circuit description file (§6.1).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CircuitParseError {
    /// The file is missing one of the five mandatory header lines.
    #[snafu(display("truncated header: expected at least {expected} lines, found {found}"))]
    TruncatedHeader { expected: usize, found: usize },

    /// A header line's value failed to parse as the expected type (e.g. `SHARES abc`).
    #[snafu(display("line {line}: invalid header value for {field}: {value:?}"))]
    InvalidHeaderValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The `OUT` header did not name exactly one output.
    #[snafu(display("expected exactly one OUT name, found {found}"))]
    WrongOutputCount { found: usize },

    /// An equation line had a token count that matches none of COPY/NEG/BINOP.
    #[snafu(display("line {line}: malformed equation: {text:?}"))]
    MalformedEquation { line: usize, text: String },

    /// An equation used an operator token other than `+` or `*`.
    #[snafu(display("line {line}: unknown operator {op:?}"))]
    UnknownOperator { line: usize, op: String },

    /// An equation's RHS referenced a wire that is not an input, random, constant,
    /// duplicated input, or a `dst` defined by an earlier equation.
    #[snafu(display("line {line}: wire {wire:?} used before definition"))]
    UndefinedWire { line: usize, wire: String },

    /// Two equations in the file declare the same internal `dst` name.
    #[snafu(display("line {line}: duplicate definition of wire {wire:?}"))]
    DuplicateDefinition { line: usize, wire: String },

    /// Output-equation segregation (§4.2) did not find one equation per expected
    /// output-duplicate name. This indicates a malformed circuit (an output duplicate was
    /// never assigned) rather than a bug in the segregation algorithm itself.
    #[snafu(display(
        "expected {expected} output equations (shares * duplications), found {found}"
    ))]
    MissingOutputEquations { expected: usize, found: usize },
}

/// Failures produced while validating CLI arguments (§6.2).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("-s must be 0 or 1, got {value}"))]
    InvalidPolarity { value: u8 },

    #[snafu(display("--fault-rate must be in [0, 1], got {value}"))]
    InvalidFaultRate { value: f64 },
}

/// Failures produced while writing the sidecar report file (§6.3).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
    #[snafu(display("could not write sidecar file {path:?}: {source}"))]
    WriteFailed {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Top-level error returned by the `maskfault` binary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MaskfaultError {
    #[snafu(display("could not read circuit file {path:?}: {source}"))]
    ReadCircuit {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("{source}"))]
    Parse { source: CircuitParseError },

    #[snafu(display("{source}"))]
    Cli { source: CliError },

    #[snafu(display("{source}"))]
    Report { source: ReportError },
}
