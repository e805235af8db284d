use std::{borrow::Cow, fmt};

/// Tags every message with the name of the component that logged it.
#[derive(Debug, Clone)]
pub struct PrefixedLogger {
    prefix: Cow<'static, str>,
}

impl PrefixedLogger {
    pub fn new(prefix: impl Into<Cow<'static, str>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Uses the bare type name of `T` as the prefix.
    pub fn for_type<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let short = full.rsplit("::").next().unwrap_or(full);
        Self::new(short.to_owned())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn format(&self, args: fmt::Arguments<'_>) -> String {
        format!("{}: {}", self.prefix, args)
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!("{}", self.format(args));
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!("{}", self.format(args));
    }
}
