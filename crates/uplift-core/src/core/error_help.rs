//! Human-readable error rendering with suggestions for the CLI.

use crate::core::error::UpliftError;

/// Suggestions attached to an error when it is shown to a user.
pub trait ErrorHelp {
    /// A hint describing how the user might recover, if one applies.
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for UpliftError {
    fn help(&self) -> Option<&'static str> {
        match self {
            UpliftError::RemoteFetch(_) => Some(
                "Check your network connection. If you are behind a proxy, pass --proxy host:port or set `proxy` in config.yaml.",
            ),
            UpliftError::Extraction(_) => {
                Some("The archive might be corrupted. Remove it from the temp directory and download it again.")
            }
            UpliftError::Overwrite(_) => Some(
                "The install directory may be partially updated. Restore it from your backup before retrying.",
            ),
            UpliftError::NotFound(_) => {
                Some("Run `uplift releases` to list the versions available on the remote.")
            }
            UpliftError::Config(_) | UpliftError::Yaml(_) => {
                Some("Check config.yaml or pass --repo owner/repo on the command line.")
            }
            UpliftError::Io(_) | UpliftError::Path(_) => None,
        }
    }
}

/// Format an error together with its help text.
pub fn format_error_with_help(error: &UpliftError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}
