use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

/// Callback invoked when a debug-only contract check fails.
///
/// Receives the textual description of the violated expectation, prefixed with the
/// source file that detected it.
pub type ContractFailureHandler = fn(expression: &str);

static HANDLER: OnceLock<ContractFailureHandler> = OnceLock::new();

/// Installs the process-wide contract failure handler.
///
/// The handler can be installed at most once, before the first violation is
/// reported; later calls leave the original handler in place and return an error.
/// If no handler is ever installed, violations are written to stderr and execution
/// continues on the operation's documented failure path.
///
/// There is no teardown: the handler is a plain function reference that remains
/// installed for the life of the process.
///
/// # Examples
///
/// ```
/// use raw_alloc::set_contract_failure_handler;
///
/// fn log_violation(expression: &str) {
///     eprintln!("contract violated: {expression}");
/// }
///
/// // First installation wins; a second attempt is rejected.
/// if set_contract_failure_handler(log_violation).is_ok() {
///     assert!(set_contract_failure_handler(log_violation).is_err());
/// }
/// ```
///
/// # Errors
///
/// Returns [`HandlerAlreadyInstalledError`] if a handler has already been installed.
pub fn set_contract_failure_handler(
    handler: ContractFailureHandler,
) -> Result<(), HandlerAlreadyInstalledError> {
    HANDLER
        .set(handler)
        .map_err(|_| HandlerAlreadyInstalledError(()))
}

/// Reports a failed contract check to the installed handler.
///
/// This is the entry point the [`debug_contract!`] and [`contract_violation!`]
/// macros expand to; calling it directly is rarely useful outside of tests.
pub fn contract_failure(expression: &str) {
    let handler = HANDLER.get().copied().unwrap_or(default_handler);
    handler(expression);
}

fn default_handler(expression: &str) {
    eprintln!("{expression}");
}

/// The error returned when a second contract failure handler installation is attempted.
#[derive(Debug)]
pub struct HandlerAlreadyInstalledError(pub(crate) ());

impl fmt::Display for HandlerAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a contract failure handler has already been installed")
    }
}

impl Error for HandlerAlreadyInstalledError {}

/// Reports a contract violation when `$condition` is false, in debug builds only.
///
/// In release builds the check compiles to nothing; the caller is expected to pair
/// every use with a safe failure path that holds in all builds.
#[macro_export]
macro_rules! debug_contract {
    ($condition:expr, $message:literal) => {
        if cfg!(debug_assertions) && !$condition {
            $crate::contract_failure(concat!(file!(), ": ", $message));
        }
    };
}

/// Unconditionally reports a contract violation, in debug builds only.
///
/// Used on code paths that have already established the violation and only need to
/// surface it before taking the safe failure path.
#[macro_export]
macro_rules! contract_violation {
    ($message:literal) => {
        if cfg!(debug_assertions) {
            $crate::contract_failure(concat!(file!(), ": ", $message));
        }
    };
}
