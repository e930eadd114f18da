//! Resolved options for clearing caches and displaying sizes.

/// How a `clear` run behaves.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearOptions {
    /// List what would be removed without removing anything
    pub dry_run: bool,

    /// Skip the confirmation prompt
    pub yes: bool,

    /// Move subdirectories to the system trash instead of deleting them
    pub use_trash: bool,
}

/// How sizes are shown to the user.
#[derive(Clone, Copy, Debug)]
pub struct DisplayOptions {
    /// Use binary units (KiB, MiB) rather than decimal ones (kB, MB)
    pub binary: bool,

    /// Print raw byte counts instead of formatted sizes
    pub raw_bytes: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            binary: true,
            raw_bytes: false,
        }
    }
}

impl DisplayOptions {
    /// Render `bytes` according to these options.
    #[must_use]
    pub fn render(&self, bytes: u64) -> String {
        if self.raw_bytes {
            bytes.to_string()
        } else {
            crate::utils::format_bytes(bytes, self.binary)
        }
    }
}
