/// Fatal compilation failures.
///
/// Malformed markup is never an error: every construct falls back to
/// literal text. These variants only fire when the plugin shield and the
/// block/inline compilers disagree, which is a defect in this crate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("plugin placeholder {0} has no entry in the plugin table")]
    UnknownPlugin(usize),
    #[error("unreachable grammar branch: {0}")]
    Unreachable(&'static str),
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
