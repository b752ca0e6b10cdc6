//! The viewer application: page navigation, load bookkeeping and frames.
//!
//! `App` holds every piece of viewer state and is driven entirely from the
//! main loop: input events and load outcomes go in, load requests and
//! finished frames come out. It never touches the terminal or the network
//! itself, which keeps it testable.

use crate::actor::{InputEvent, KeyCode, KeyModifiers, LoadEvent, LoadRequest};
use crate::buffer::Buffer;
use crate::layout::split_screen;
use crate::loader::{LoadTracker, PageNaming};
use crate::widget::{PageView, StatusBar, ViewState, Widget};
use tracing::{debug, info, warn};

/// Current page number with a floor of zero and no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageNav {
    page: u32,
}

impl PageNav {
    /// Start at `page`.
    pub const fn new(page: u32) -> Self {
        Self { page }
    }

    /// The current page.
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Whether [`PageNav::previous`] would do anything.
    pub const fn can_go_previous(&self) -> bool {
        self.page > 0
    }

    /// Go back one page. Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Advance one page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        match self.page.checked_add(1) {
            Some(page) => {
                self.page = page;
                true
            }
            None => false,
        }
    }
}

/// The whole viewer.
#[derive(Debug)]
pub struct App {
    naming: PageNaming,
    nav: PageNav,
    tracker: LoadTracker,
    page_view: PageView,
    status: StatusBar,
    buffer: Buffer,
    pending: Option<LoadRequest>,
    running: bool,
}

impl App {
    /// A viewer for a `width × height` terminal, starting at `initial_page`.
    ///
    /// The first load request is ready in [`App::take_request`].
    pub fn new(naming: PageNaming, initial_page: u32, width: u16, height: u16) -> Self {
        let (view_area, status_area) = split_screen(width, height);
        let mut app = Self {
            naming,
            nav: PageNav::new(initial_page),
            tracker: LoadTracker::new(),
            page_view: PageView::new(view_area),
            status: StatusBar::new(status_area),
            buffer: Buffer::new(width.max(1), height.max(1)),
            pending: None,
            running: true,
        };
        app.request_current_page();
        app
    }

    /// Page navigation state.
    pub const fn nav(&self) -> &PageNav {
        &self.nav
    }

    /// The page view.
    pub const fn page_view(&self) -> &PageView {
        &self.page_view
    }

    /// The status bar.
    pub const fn status(&self) -> &StatusBar {
        &self.status
    }

    /// What the page view is showing.
    pub const fn state(&self) -> &ViewState {
        self.page_view.state()
    }

    /// False once the user asked to quit.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The load the app wants issued next, if any.
    pub fn take_request(&mut self) -> Option<LoadRequest> {
        self.pending.take()
    }

    fn request_current_page(&mut self) {
        let page = self.nav.page();
        let generation = self.tracker.issue();
        debug!(page, generation, "requesting page");
        self.page_view.set_loading(page);
        self.pending = Some(LoadRequest { generation, page });
    }

    /// Apply a load outcome, unless a newer request superseded it.
    ///
    /// Returns whether the outcome was applied.
    pub fn handle_load_event(&mut self, event: LoadEvent) -> bool {
        if !self.tracker.is_current(event.generation()) {
            debug!(
                generation = event.generation(),
                latest = self.tracker.latest(),
                "discarding stale load"
            );
            return false;
        }
        match event {
            LoadEvent::Loaded { page, .. } => {
                info!(page = page.page, file = %page.file_name, "showing page");
                self.page_view.show_page(*page);
            }
            LoadEvent::Failed { page, message, .. } => {
                warn!(page, %message, "showing load failure");
                self.page_view.show_error(message);
            }
        }
        true
    }

    /// React to an input event.
    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key { code, modifiers } => self.handle_key(*code, *modifiers),
            InputEvent::Resize { width, height } => self.resize(*width, *height),
            InputEvent::Shutdown => self.running = false,
            InputEvent::Error(message) => warn!(%message, "input error"),
            other => {
                self.page_view.handle_input(other);
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let rows = i32::from(self.page_view.bounds().height);
        match (code, modifiers.shift) {
            (KeyCode::Char('q') | KeyCode::Esc, _) => self.running = false,
            (KeyCode::Char('c'), _) if modifiers.control => self.running = false,
            (KeyCode::Left, false) | (KeyCode::Char('p'), _) => {
                if self.nav.previous() {
                    self.request_current_page();
                }
            }
            (KeyCode::Right, false) | (KeyCode::Char('n'), _) => {
                if self.nav.next() {
                    self.request_current_page();
                }
            }
            (KeyCode::Char('r'), _) => self.request_current_page(),
            (KeyCode::Char('+' | '='), _) => {
                self.page_view.zoom_in();
            }
            (KeyCode::Char('-'), _) => {
                self.page_view.zoom_out();
            }
            (KeyCode::Char('f'), _) => {
                self.page_view.fit_width();
            }
            (KeyCode::Left, true) | (KeyCode::Char('h'), _) => self.page_view.scroll(-4, 0),
            (KeyCode::Right, true) | (KeyCode::Char('l'), _) => self.page_view.scroll(4, 0),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.page_view.scroll(0, -2),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.page_view.scroll(0, 2),
            (KeyCode::PageUp, _) => self.page_view.scroll(0, -rows),
            (KeyCode::PageDown, _) => self.page_view.scroll(0, rows),
            (KeyCode::Home, _) => self.page_view.scroll(0, i32::MIN / 4),
            (KeyCode::End, _) => self.page_view.scroll(0, i32::MAX / 4),
            _ => {}
        }
    }

    /// Re-split the screen for a new terminal size.
    pub fn resize(&mut self, width: u16, height: u16) {
        let (view_area, status_area) = split_screen(width, height);
        self.page_view.set_bounds(view_area);
        self.status.set_bounds(status_area);
        self.buffer.resize(width.max(1), height.max(1));
    }

    fn update_status(&mut self) {
        let page = self.nav.page();
        self.status.set_left(format!("{}  page {page}", self.naming.file_name(page)));

        match self.page_view.state() {
            ViewState::Loading { .. } => self.status.set_center("loading…"),
            ViewState::Failed { message } => {
                let text = format!("error: {message}");
                self.status.set_error(text);
            }
            ViewState::Ready => {
                let boxes = self.page_view.editor().rects().len();
                let zoom = self.page_view.viewport().zoom();
                let hover = self.page_view.hover();
                let text = if hover.is_active() {
                    format!("{boxes} boxes  1:{zoom}  {hover}")
                } else {
                    format!("{boxes} boxes  1:{zoom}")
                };
                self.status.set_center(text);
            }
        }

        let hints = if self.nav.can_go_previous() {
            "p/n page  +/- zoom  q quit"
        } else {
            "n page  +/- zoom  q quit"
        };
        self.status.set_right(hints);
    }

    /// Draw the next frame if anything changed since the last one.
    pub fn frame(&mut self) -> Option<&Buffer> {
        self.update_status();
        if !self.page_view.needs_redraw() && !self.status.needs_redraw() {
            return None;
        }
        self.page_view.render(&mut self.buffer);
        self.status.render(&mut self.buffer);
        self.page_view.clear_redraw();
        self.status.clear_redraw();
        Some(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{MouseButton, MouseEvent};
    use crate::document::LayoutDocument;
    use crate::loader::tests::LAYOUT;
    use crate::loader::{LoadedPage, PageFormat};
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(PageNaming::new("Fizika", PageFormat::default()), 0, 120, 61)
    }

    fn loaded(app: &mut App, layout: &str) -> LoadEvent {
        let request = app.take_request().unwrap();
        LoadEvent::Loaded {
            generation: request.generation,
            page: Box::new(LoadedPage {
                page: request.page,
                file_name: format!("Fizika-{:04}", request.page),
                document: LayoutDocument::from_slice(layout.as_bytes()).unwrap(),
                image: RgbaImage::from_pixel(120, 100, Rgba([255, 255, 255, 255])),
            }),
        }
    }

    fn key(app: &mut App, c: char) {
        app.handle_input(&InputEvent::key(KeyCode::Char(c)));
    }

    #[test]
    fn test_page_nav_bounds() {
        let mut nav = PageNav::new(0);
        assert!(!nav.can_go_previous());
        assert!(!nav.previous());
        assert_eq!(nav.page(), 0);

        for _ in 0..1000 {
            assert!(nav.next());
        }
        assert_eq!(nav.page(), 1000);
        assert!(nav.previous());
        assert_eq!(nav.page(), 999);

        let mut last = PageNav::new(u32::MAX);
        assert!(!last.next());
    }

    #[test]
    fn test_initial_request() {
        let mut app = app();
        assert_eq!(app.take_request(), Some(LoadRequest { generation: 1, page: 0 }));
        assert_eq!(app.take_request(), None);
        assert_eq!(app.state(), &ViewState::Loading { page: 0 });
    }

    #[test]
    fn test_previous_disabled_at_first_page() {
        let mut app = app();
        app.take_request();
        app.handle_input(&InputEvent::key(KeyCode::Left));
        assert_eq!(app.take_request(), None);
        assert_eq!(app.nav().page(), 0);
    }

    #[test]
    fn test_load_shows_page() {
        let mut app = app();
        let event = loaded(&mut app, LAYOUT);
        assert!(app.handle_load_event(event));
        assert_eq!(app.state(), &ViewState::Ready);
        assert_eq!(app.page_view().editor().rects().len(), 2);

        app.frame();
        assert_eq!(app.status().left(), "Fizika-0000  page 0");
        assert_eq!(app.status().center(), "2 boxes  1:1");
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut app = app();
        let stale = loaded(&mut app, LAYOUT);
        key(&mut app, 'n');
        assert!(!app.handle_load_event(stale));
        assert_eq!(app.state(), &ViewState::Loading { page: 1 });

        let current = loaded(&mut app, LAYOUT);
        assert!(app.handle_load_event(current));
        assert_eq!(app.page_view().page().map(|p| p.page), Some(1));
    }

    #[test]
    fn test_page_switch_replaces_boxes() {
        let mut app = app();
        let event = loaded(&mut app, LAYOUT);
        app.handle_load_event(event);
        let old_ids: Vec<_> = app.page_view().editor().rects().iter().map(|r| r.id).collect();

        key(&mut app, 'n');
        assert!(app.page_view().editor().rects().is_empty());

        let event = loaded(
            &mut app,
            r#"{"pdf_info": [{"para_blocks": [{"type": "image", "bbox": [0, 0, 10, 10]}]}]}"#,
        );
        app.handle_load_event(event);
        let rects = app.page_view().editor().rects();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].color.name, "green");
        assert!(!old_ids.contains(&rects[0].id));
    }

    #[test]
    fn test_failure_blanks_view() {
        let mut app = app();
        let request = app.take_request().unwrap();
        app.handle_load_event(LoadEvent::Failed {
            generation: request.generation,
            page: 0,
            message: "HTTP 500".into(),
        });
        assert_eq!(
            app.state(),
            &ViewState::Failed {
                message: "HTTP 500".into()
            }
        );
        assert!(app.page_view().page().is_none());
        app.frame();
        assert!(app.status().is_error());
        assert_eq!(app.status().center(), "error: HTTP 500");
    }

    #[test]
    fn test_drag_through_app() {
        let mut app = app();
        let event = loaded(&mut app, LAYOUT);
        app.handle_load_event(event);

        let at = |x, y| MouseEvent::at(x, y, Some(MouseButton::Left));
        app.handle_input(&InputEvent::MouseDown(at(60, 22)));
        app.handle_input(&InputEvent::MouseMove(at(62, 22)));
        app.frame();
        assert_eq!(app.status().center(), "2 boxes  1:1  move");
        app.handle_input(&InputEvent::MouseUp(at(62, 22)));

        assert_eq!(app.page_view().editor().rects()[0].bbox(), [12.0, 20.0, 112.0, 70.0]);
    }

    #[test]
    fn test_frames_only_when_dirty() {
        let mut app = app();
        assert!(app.frame().is_some());
        assert!(app.frame().is_none());
        app.resize(100, 40);
        let frame = app.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (100, 40));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        key(&mut app, 'q');
        assert!(!app.is_running());

        let mut app = self::app();
        app.handle_input(&InputEvent::Key {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        });
        assert!(!app.is_running());
    }
}
