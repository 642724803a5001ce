use core::fmt::{self, Display};

/// Holds the context for the current dump. Used for prefixing logs.
#[derive(Default, Debug)]
pub struct Context {
    /// The database being dumped.
    pub database: String,
    /// The current context
    pub current_context: &'static str,
}

impl Context {
    /// Create the context for dumping a database.
    pub fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            current_context: "",
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.database)?;

        if !self.current_context.is_empty() {
            write!(f, "[{}] ", self.current_context)?;
        }

        Ok(())
    }
}
