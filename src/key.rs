//! Request Key Module
//!
//! A concrete implementation of the key-derivation contract callers use in
//! front of the cache: a command's qualified name, its normalized arguments,
//! and any extra discriminators the caller folds in (currently an NSFW-channel
//! flag, so safe and unsafe contexts never share an entry).
//!
//! The cache itself is generic over any `Eq + Hash` key; `RequestKey` is the
//! helper for the common "same command + same arguments = same entry" case.

use std::fmt;

use serde::Serialize;

// == Request Key ==
/// Identity of one logical cached request.
///
/// Two keys are equal exactly when the command name, the argument list
/// (order-sensitive) and the discriminators all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequestKey {
    /// Fully qualified command name, e.g. `"anime search"`
    command: String,
    /// Stringified positional arguments in call order
    args: Vec<String>,
    /// Whether the request originated from an NSFW context
    nsfw: bool,
}

impl RequestKey {
    // == Constructor ==
    /// Creates a key for the given command with no arguments, SFW context.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            nsfw: false,
        }
    }

    // == Builders ==
    /// Appends one stringified argument.
    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Appends several stringified arguments in order.
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: ToString,
    {
        self.args.extend(args.into_iter().map(|a| a.to_string()));
        self
    }

    /// Sets the NSFW-context discriminator.
    pub fn nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }

    // == Accessors ==
    /// The command name this key was built for.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for RequestKey {
    /// Stable `command:arg:arg` rendering, with a `#nsfw` suffix when set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.args {
            write!(f, ":{arg}")?;
        }
        if self.nsfw {
            write!(f, "#nsfw")?;
        }
        Ok(())
    }
}
