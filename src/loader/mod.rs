//! Page loader: fetches a page's layout document and raster.
//!
//! A load fetches both resources concurrently and succeeds only when both
//! arrive and decode. Every request carries a generation from a
//! [`LoadTracker`]; a response is applied only if its generation is still
//! the newest one issued, so a slow load cannot overwrite a newer page.

mod error;
mod naming;
mod source;

pub use error::LoadError;
pub use naming::{PageFormat, PageNaming, DEFAULT_PAGE_WIDTH};
pub use source::{HttpPageSource, PageSource, IMAGE_ENDPOINT, LAYOUT_ENDPOINT};

use crate::document::LayoutDocument;
use image::RgbaImage;
use std::fmt;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// A fully loaded page.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// Page number.
    pub page: u32,
    /// Resource name both files were fetched under.
    pub file_name: String,
    /// Parsed layout.
    pub document: LayoutDocument,
    /// Decoded raster at its natural size.
    pub image: RgbaImage,
}

/// Loads pages from a [`PageSource`].
#[derive(Clone)]
pub struct PageLoader {
    source: Arc<dyn PageSource>,
    naming: PageNaming,
}

impl fmt::Debug for PageLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageLoader")
            .field("naming", &self.naming)
            .finish_non_exhaustive()
    }
}

impl PageLoader {
    /// A loader reading from `source` with the given naming scheme.
    pub fn new(source: Arc<dyn PageSource>, naming: PageNaming) -> Self {
        Self { source, naming }
    }

    /// Fetch, parse and decode one page.
    ///
    /// Blocks until both fetches finish. Either one failing fails the load.
    pub fn load(&self, page: u32) -> Result<LoadedPage, LoadError> {
        let file_name = self.naming.file_name(page);
        debug!(page, %file_name, "loading page");

        let source = self.source.as_ref();
        let name = file_name.as_str();
        let (layout, image) = thread::scope(|scope| {
            let layout = scope.spawn(move || source.fetch_layout(name));
            let image = scope.spawn(move || source.fetch_image(name));
            (join(layout, "layout"), join(image, "image"))
        });
        let (layout, image) = (layout?, image?);

        let document = LayoutDocument::from_slice(&layout)?;
        let image = image::load_from_memory(&image)?.to_rgba8();

        info!(
            page,
            %file_name,
            width = image.width(),
            height = image.height(),
            pages = document.pdf_info.len(),
            "page loaded"
        );
        Ok(LoadedPage {
            page,
            file_name,
            document,
            image,
        })
    }
}

fn join(
    handle: thread::ScopedJoinHandle<'_, Result<Vec<u8>, LoadError>>,
    what: &str,
) -> Result<Vec<u8>, LoadError> {
    handle
        .join()
        .map_err(|_| LoadError::Worker(format!("{what} fetch panicked")))?
}

/// Issues load generations and tells whether a response is still wanted.
#[derive(Debug, Default, Clone)]
pub struct LoadTracker {
    latest: u64,
}

impl LoadTracker {
    /// A tracker with nothing issued.
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Stamp a new request. Supersedes every earlier generation.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// The newest generation issued.
    pub const fn latest(&self) -> u64 {
        self.latest
    }

    /// Whether a response for `generation` should be applied.
    pub const fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;
    use std::sync::Mutex;

    pub(crate) const LAYOUT: &str = r#"{
        "pdf_info": [{
            "page_idx": 0,
            "preproc_blocks": [
                {"type": "text", "bbox": [10, 20, 110, 70]},
                {"type": "title", "bbox": [5, 5, 60, 15]}
            ]
        }],
        "_parse_type": "ocr"
    }"#;

    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    /// In-memory source recording every requested name.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub layout: Option<Vec<u8>>,
        pub image: Option<Vec<u8>>,
        pub requested: Mutex<Vec<String>>,
    }

    impl FakeSource {
        pub(crate) fn page(width: u32, height: u32) -> Self {
            Self {
                layout: Some(LAYOUT.as_bytes().to_vec()),
                image: Some(png(width, height)),
                requested: Mutex::default(),
            }
        }

        fn serve(&self, kind: &str, name: &str, body: Option<&Vec<u8>>) -> Result<Vec<u8>, LoadError> {
            self.requested.lock().unwrap().push(format!("{kind}:{name}"));
            body.cloned().ok_or_else(|| LoadError::Status {
                url: format!("fake/{kind}?fileName={name}"),
                status: 404,
            })
        }
    }

    impl PageSource for FakeSource {
        fn fetch_layout(&self, file_name: &str) -> Result<Vec<u8>, LoadError> {
            self.serve("layout", file_name, self.layout.as_ref())
        }

        fn fetch_image(&self, file_name: &str) -> Result<Vec<u8>, LoadError> {
            self.serve("image", file_name, self.image.as_ref())
        }
    }

    fn loader(source: FakeSource) -> (PageLoader, Arc<FakeSource>) {
        let source = Arc::new(source);
        let loader = PageLoader::new(source.clone(), PageNaming::new("Fizika", PageFormat::default()));
        (loader, source)
    }

    #[test]
    fn test_load_requests_named_resources() {
        let (loader, source) = loader(FakeSource::page(40, 30));
        let page = loader.load(1).unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.file_name, "Fizika-0001");
        assert_eq!(page.image.dimensions(), (40, 30));
        assert_eq!(page.document.first_page().unwrap().blocks().len(), 2);

        let mut requested = source.requested.lock().unwrap().clone();
        requested.sort();
        assert_eq!(requested, vec!["image:Fizika-0001", "layout:Fizika-0001"]);
    }

    #[test]
    fn test_missing_layout_fails_load() {
        let (loader, _) = loader(FakeSource {
            layout: None,
            ..FakeSource::page(4, 4)
        });
        assert_eq!(loader.load(0).unwrap_err().status(), Some(404));
    }

    #[test]
    fn test_missing_image_fails_load() {
        let (loader, _) = loader(FakeSource {
            image: None,
            ..FakeSource::page(4, 4)
        });
        assert!(loader.load(0).is_err());
    }

    #[test]
    fn test_bad_payloads() {
        let (json_loader, _) = loader(FakeSource {
            layout: Some(b"not json".to_vec()),
            ..FakeSource::page(4, 4)
        });
        assert!(matches!(json_loader.load(0), Err(LoadError::Parse(_))));

        let (image_loader, _) = loader(FakeSource {
            image: Some(b"not an image".to_vec()),
            ..FakeSource::page(4, 4)
        });
        assert!(matches!(image_loader.load(0), Err(LoadError::Image(_))));
    }

    #[test]
    fn test_tracker_discards_stale_generations() {
        let mut tracker = LoadTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert_eq!(tracker.latest(), second);
    }
}
