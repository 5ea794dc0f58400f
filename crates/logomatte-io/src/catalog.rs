//! Logo catalog: which source files to look for and what to call the output.

/// One logical logo: the exported source file name and the canonical
/// output name it is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoEntry {
    /// File name (or file-name suffix) of the source PNG.
    pub source_name: &'static str,
    /// File name written into the output directory.
    pub output_name: &'static str,
}

impl LogoEntry {
    /// Returns `true` if `file_name` is this logo's source file.
    ///
    /// Exported assets are often prefixed (`3_image-...png`,
    /// `logo_image-...png`), so a suffix match is enough.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(self.source_name)
    }
}

/// Ordered, immutable table of logos to extract.
///
/// Order matters: output files are produced in catalog order regardless
/// of how the filesystem lists the sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoCatalog {
    entries: &'static [LogoEntry],
}

/// The MarDelux family: wordmark, lotus mark, and the combined lockup.
const MARDELUX: &[LogoEntry] = &[
    LogoEntry {
        source_name: "image-12dcd7b3-841f-4ccc-9b73-f03bfef6074a.png",
        output_name: "logo-texto.png",
    },
    LogoEntry {
        source_name: "image-468a3e27-c9e0-438c-8e55-a8d5d0263cb2.png",
        output_name: "logo-lotus.png",
    },
    LogoEntry {
        source_name: "image-a14242b4-331e-453c-9c4b-954dc9110a24.png",
        output_name: "logo-completo.png",
    },
];

impl LogoCatalog {
    /// Build a catalog from a static table.
    #[must_use]
    pub const fn new(entries: &'static [LogoEntry]) -> Self {
        Self { entries }
    }

    /// The built-in MarDelux logo catalog.
    #[must_use]
    pub const fn mardelux() -> Self {
        Self::new(MARDELUX)
    }

    /// Entries in output order.
    #[must_use]
    pub const fn entries(&self) -> &'static [LogoEntry] {
        self.entries
    }

    /// Number of logos in the catalog.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LogoCatalog {
    fn default() -> Self {
        Self::mardelux()
    }
}
