use thiserror::Error;

use crate::stripper::StripKind;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure in stripscope is fatal to the strip pass: a strip either fully applies or the
/// pass terminates with a diagnostic identifying the offending declaration. There is no retry
/// policy and no partial-success mode.
///
/// # Error Categories
///
/// ## Malformed-input errors
/// - [`Error::Malformed`] - Corrupted or invalid unit structure (e.g. an unparsable descriptor)
/// - [`Error::MissingInitializer`] - A required static initializer is absent
///
/// ## Resolution failures
/// - [`Error::UnitNotFound`] - A redirection or override target could not be resolved
/// - [`Error::DuplicateUnit`] - A unit with the same qualified name was staged twice
/// - [`Error::FileError`] - I/O failure inside a bytecode provider
///
/// ## Pass failures
/// - [`Error::StripFailed`] - Wraps any of the above with the declaration that was being
///   stripped, so the host's diagnostic names the qualified name and kind
///
/// # Examples
///
/// ```rust
/// use stripscope::{Error, metadata::CompiledUnit, stripper::strip_field};
///
/// let mut unit = CompiledUnit::new("demo/NoInit");
/// match strip_field("I", &mut unit) {
///     Err(Error::MissingInitializer { unit }) => {
///         eprintln!("no static initializer in {unit}");
///     }
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A unit or descriptor is damaged and could not be processed.
    ///
    /// This error indicates that the in-memory structure handed to the stripper does not
    /// conform to the expected shape. The error includes the source location where the
    /// malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The static initializer required by a field strip is absent.
    ///
    /// Field removal edits the owning unit's static initializer; a unit that declares a
    /// strippable static field but carries no initializer method is assumed malformed.
    #[error("No static initializer present in unit '{unit}'")]
    MissingInitializer {
        /// Qualified name of the unit that was expected to carry the initializer
        unit: String,
    },

    /// A qualified name could not be resolved to a compiled unit.
    ///
    /// Raised by [`crate::stripper::BytecodeProvider`] implementations when a redirection
    /// or override target names a unit that does not exist. The selector treats this as
    /// fatal - a strip is never partially applied.
    #[error("Failed to resolve unit '{0}'")]
    UnitNotFound(String),

    /// A unit with this qualified name has already been staged.
    ///
    /// Qualified names are the identity of a compiled unit; staging two units under the
    /// same name would make resolution ambiguous.
    #[error("A unit named '{0}' is already staged")]
    DuplicateUnit(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors surfaced by bytecode providers that load units from
    /// disk or other external storage.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A strip operation failed part-way and the pass was aborted.
    ///
    /// Carries the qualified name and kind of the declaration that was being stripped,
    /// so the host process can surface which declaration doomed the pass before any
    /// edited unit is ever activated.
    #[error("Stripping {kind} '{declaration}' failed: {source}")]
    StripFailed {
        /// Qualified name of the declaration whose strip failed
        declaration: String,
        /// The kind of declaration (class, method, or field)
        kind: StripKind,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for wrapping host-side
    /// failures with additional context.
    #[error("{0}")]
    Error(String),
}
