//! File names of page resources: `{prefix}-{formatted page number}`.

use std::fmt;
use std::sync::Arc;

/// Default zero-pad width of page numbers.
pub const DEFAULT_PAGE_WIDTH: usize = 4;

/// How a page number is written into a file name.
#[derive(Clone)]
pub enum PageFormat {
    /// Decimal, left-padded with zeros to the given width.
    ZeroPadded(usize),
    /// Caller-supplied formatter.
    Custom(Arc<dyn Fn(u32) -> String + Send + Sync>),
}

impl PageFormat {
    /// Wrap a formatting function.
    pub fn custom(f: impl Fn(u32) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Format a page number.
    pub fn format(&self, page: u32) -> String {
        match self {
            Self::ZeroPadded(width) => format!("{page:0width$}"),
            Self::Custom(f) => f(page),
        }
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::ZeroPadded(DEFAULT_PAGE_WIDTH)
    }
}

impl fmt::Debug for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPadded(width) => f.debug_tuple("ZeroPadded").field(width).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Builds resource names for pages of one document.
#[derive(Debug, Clone, Default)]
pub struct PageNaming {
    prefix: String,
    format: PageFormat,
}

impl PageNaming {
    /// Names `{prefix}-{page}` with the given page format.
    pub fn new(prefix: impl Into<String>, format: PageFormat) -> Self {
        Self {
            prefix: prefix.into(),
            format,
        }
    }

    /// The document prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The resource name of a page.
    pub fn file_name(&self, page: u32) -> String {
        format!("{}-{}", self.prefix, self.format.format(page))
    }
}
