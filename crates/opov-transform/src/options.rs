//! Pass configuration.

/// Options for [`transform_program`](crate::transform_program).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Whether rewriting is on in a unit whose prologue carries no
    /// `operator-overload` directive
    pub enabled_by_default: bool,
}

impl TransformOptions {
    /// Creates the default options: rewriting enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled_by_default: true,
        }
    }

    /// Sets whether undirected units are rewritten.
    #[must_use]
    pub const fn with_enabled_by_default(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }

    /// Options for opt-in use: only units or blocks that say
    /// `'operator-overload enabled'` are rewritten.
    #[must_use]
    pub const fn opt_in() -> Self {
        Self::new().with_enabled_by_default(false)
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self::new()
    }
}
