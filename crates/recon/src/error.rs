use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (alias chain, empty bridge, etc.).
    ConfigValidation(String),
    /// An alias maps a name onto a key that is itself aliased.
    AliasChain { from: String, to: String },
    /// The bridged item names itself as one of its successors.
    BridgeSelfTarget(String),
    /// IO error (config file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::AliasChain { from, to } => {
                write!(f, "alias '{from}' -> '{to}': target is itself aliased")
            }
            Self::BridgeSelfTarget(name) => {
                write!(f, "bridge source '{name}' cannot also be a successor")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
