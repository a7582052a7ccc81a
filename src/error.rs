use thiserror::Error;

use crate::typesystem::ClassId;

macro_rules! structural_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Structural {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Structural {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every error is fatal to the build it was raised in; nothing is retried or recovered
/// locally. Messages name the type or member chain involved, so a failure can be located
/// without re-running the build.
///
/// # Error Categories
///
/// ## Caller Errors
/// - [`Error::Usage`] - The API was called with arguments that can never succeed
///
/// ## Graph Construction Errors
/// - [`Error::Resolution`] - A type variable could not be bound to a concrete type
/// - [`Error::Structural`] - A combination of type shapes the builder has no case for
///
/// ## Type System Errors
/// - [`Error::ClassNotFound`] - A descriptor references an unknown class
/// - [`Error::ClassInsert`] - A class id was registered twice
///
/// # Examples
///
/// ```rust
/// use blueprint::prelude::*;
///
/// let registry = std::sync::Arc::new(ClassRegistry::new()?);
/// let list = registry.platform(PlatformKind::List);
///
/// match RootContext::builder(registry.clone(), TypeDescriptor::concrete(list)).build() {
///     Ok(_) => println!("raw list accepted"),
///     Err(Error::Usage(message)) => eprintln!("Invalid request: {message}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok::<(), blueprint::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The caller asked for something that can never succeed.
    ///
    /// Raised for a root type invoked with the wrong number of type arguments, generic
    /// classes supplied as type arguments, invalid subtype substitutions and nullable
    /// overrides on primitives.
    #[error("{0}")]
    Usage(String),

    /// A type variable could not be resolved.
    ///
    /// Neither the node's own parameterization, any of its ancestors, nor the root
    /// bindings supply a concrete type for the variable. This usually means the root
    /// type was requested without the type arguments its generic shape needs.
    ///
    /// # Fields
    ///
    /// * `var` - The unresolved type variable, qualified by its declaring class
    /// * `path` - The chain from the root type to the offending member
    #[error("Unable to resolve type variable '{var}' at {path}. Specify the type arguments of the root type")]
    Resolution {
        /// The type variable that could not be resolved
        var: String,
        /// Rendered chain of root type, members and offending type
        path: String,
    },

    /// An unexpected combination of type shapes.
    ///
    /// The builder encountered a descriptor it has no case for, such as a wildcard with
    /// several upper bounds. The error includes the source location where the condition
    /// was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the shape and where it occurred
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Structural - {file}:{line}: {message}")]
    Structural {
        /// The message to be printed for the Structural error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A descriptor references a class that is not part of the registry.
    #[error("Class not found - {0}")]
    ClassNotFound(ClassId),

    /// Failed to register a class.
    ///
    /// A class with the same id has already been inserted.
    #[error("Failed to insert new class - {0}")]
    ClassInsert(ClassId),
}
