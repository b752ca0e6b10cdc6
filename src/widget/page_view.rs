//! Page View Widget: the page raster with its box overlay.
//!
//! Pixels are drawn with half blocks through the [`Viewport`]. Mouse events
//! inside the view are mapped to image space and fed to the [`Editor`];
//! leaving the view or losing focus ends a drag. While a page is loading or
//! after a load failed, the view shows a centered message instead.

use super::traits::Widget;
use crate::actor::{InputEvent, MouseButton};
use crate::buffer::{Buffer, Cell, Rgb};
use crate::canvas::{compose, Canvas};
use crate::editor::{DragMode, Editor, Point};
use crate::layout::{Rect, Viewport};
use crate::loader::LoadedPage;
use unicode_width::UnicodeWidthStr;

/// Color around the page where the image ends.
pub const BACKDROP: Rgb = Rgb::new(24, 24, 24);

const MESSAGE_FG: Rgb = Rgb::new(180, 180, 180);
const ERROR_FG: Rgb = Rgb::new(230, 90, 90);

/// Rows scrolled per wheel notch.
pub const WHEEL_ROWS: i32 = 3;

/// What the page view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Waiting for a page.
    Loading {
        /// Page being fetched.
        page: u32,
    },
    /// A page is displayed and editable.
    Ready,
    /// The last load failed; nothing is displayed.
    Failed {
        /// Why.
        message: String,
    },
}

/// The page raster, its editable boxes and their overlay.
#[derive(Debug)]
pub struct PageView {
    bounds: Rect,
    viewport: Viewport,
    editor: Editor,
    canvas: Canvas,
    page: Option<LoadedPage>,
    state: ViewState,
    hover: DragMode,
    dirty: bool,
}

impl PageView {
    /// An empty view waiting for page 0.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            viewport: Viewport::new(bounds),
            editor: Editor::new(),
            canvas: Canvas::new(),
            page: None,
            state: ViewState::Loading { page: 0 },
            hover: DragMode::None,
            dirty: true,
        }
    }

    /// What is shown.
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// The displayed page, if any.
    pub const fn page(&self) -> Option<&LoadedPage> {
        self.page.as_ref()
    }

    /// The geometry editor.
    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    /// The box overlay.
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The cell-to-image mapping.
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The gesture in progress, or the one a click would start.
    pub const fn hover(&self) -> DragMode {
        self.hover
    }

    /// Drop the current page and show a loading message.
    pub fn set_loading(&mut self, page: u32) {
        self.unload();
        self.state = ViewState::Loading { page };
    }

    /// Drop the current page and show why loading failed.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.unload();
        self.state = ViewState::Failed {
            message: message.into(),
        };
    }

    /// Display a freshly loaded page and derive its boxes.
    pub fn show_page(&mut self, page: LoadedPage) {
        let (width, height) = page.image.dimensions();
        self.canvas.sync_size(width, height);
        self.editor.load_document(&page.document);
        self.viewport.set_image_size(width, height);
        self.viewport.fit_width();
        self.page = Some(page);
        self.state = ViewState::Ready;
        self.hover = DragMode::None;
        self.refresh_canvas();
        self.dirty = true;
    }

    fn unload(&mut self) {
        self.page = None;
        self.editor.clear();
        self.canvas.sync_size(0, 0);
        self.viewport.set_image_size(0, 0);
        self.hover = DragMode::None;
        self.dirty = true;
    }

    /// Show more detail.
    pub fn zoom_in(&mut self) -> bool {
        let changed = self.viewport.zoom_in();
        self.after_zoom(changed)
    }

    /// Show more of the page.
    pub fn zoom_out(&mut self) -> bool {
        let changed = self.viewport.zoom_out();
        self.after_zoom(changed)
    }

    /// Fit the page width into the view.
    pub fn fit_width(&mut self) -> bool {
        let changed = self.viewport.fit_width();
        self.after_zoom(changed)
    }

    fn after_zoom(&mut self, changed: bool) -> bool {
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Scroll by whole cells.
    pub fn scroll(&mut self, cols: i32, rows: i32) {
        let before = self.viewport.offset();
        self.viewport.scroll_by(cols, rows);
        if self.viewport.offset() != before {
            self.dirty = true;
        }
    }

    fn refresh_canvas(&mut self) {
        if self.canvas.render_if_stale(self.editor.rects(), self.editor.revision()) {
            self.dirty = true;
        }
    }

    /// Image point under a cell, only while a page is displayed.
    fn image_point(&self, col: u16, row: u16) -> Option<Point> {
        self.page.as_ref()?;
        self.viewport.cell_to_image(col, row)
    }

    fn pointer_down(&mut self, col: u16, row: u16) -> bool {
        let Some(p) = self.image_point(col, row) else {
            return false;
        };
        if let Some((_, mode)) = self.editor.pointer_down(p) {
            self.hover = mode;
        }
        true
    }

    fn pointer_move(&mut self, col: u16, row: u16) -> bool {
        if self.page.is_none() {
            return false;
        }
        let Some(p) = self.viewport.cell_to_image(col, row) else {
            self.pointer_leave();
            return false;
        };
        if self.editor.pointer_move(p) {
            self.refresh_canvas();
        }
        let mode = self.editor.drag().mode;
        self.hover = if mode.is_active() { mode } else { self.editor.hover(p) };
        true
    }

    fn pointer_up(&mut self) -> bool {
        let active = self.editor.drag().mode.is_active();
        self.editor.pointer_up();
        active
    }

    fn pointer_leave(&mut self) {
        self.editor.pointer_leave();
        self.hover = DragMode::None;
    }

    fn sample(&self, page: &LoadedPage, col: u16, row: u16, lower: bool) -> Rgb {
        self.viewport.sample(col, row, lower).map_or(BACKDROP, |(x, y)| {
            // Transparent page pixels show as paper.
            let paper = compose(Rgb::WHITE, page.image.get_pixel(x, y).0);
            compose(paper, self.canvas.pixel_in_block(x, y, self.viewport.zoom()))
        })
    }

    fn render_page(&self, page: &LoadedPage, buffer: &mut Buffer, area: Rect) {
        for row in area.y..area.bottom() {
            for col in area.x..area.right() {
                let top = self.sample(page, col, row, false);
                let bottom = self.sample(page, col, row, true);
                buffer.set(col, row, Cell::pixels(top, bottom));
            }
        }
    }

    fn render_message(buffer: &mut Buffer, area: Rect, text: &str, fg: Rgb) {
        buffer.fill_rect(area, Cell::new(' ').with_bg(BACKDROP));
        if area.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_truncation)]
        let len = text.width().min(usize::from(area.width)) as u16;
        let x = area.x + (area.width - len) / 2;
        let y = area.y + area.height / 2;
        buffer.draw_text(x, y, area.right(), text, fg, BACKDROP);
    }
}

impl Widget for PageView {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.viewport.set_area(bounds);
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        let area = self.bounds.intersection(&buffer.area());
        match (&self.state, &self.page) {
            (ViewState::Ready, Some(page)) => self.render_page(page, buffer, area),
            (ViewState::Loading { page }, _) => {
                Self::render_message(buffer, area, &format!("Loading page {page}…"), MESSAGE_FG);
            }
            (ViewState::Failed { message }, _) => Self::render_message(buffer, area, message, ERROR_FG),
            (ViewState::Ready, None) => buffer.fill_rect(area, Cell::new(' ').with_bg(BACKDROP)),
        }
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::MouseDown(mouse) if mouse.button == Some(MouseButton::Left) => {
                self.pointer_down(mouse.x, mouse.y)
            }
            InputEvent::MouseMove(mouse) => self.pointer_move(mouse.x, mouse.y),
            InputEvent::MouseUp(_) => self.pointer_up(),
            InputEvent::FocusLost => {
                self.pointer_leave();
                false
            }
            InputEvent::MouseScroll { x, y, delta } if self.bounds.contains(*x, *y) => {
                self.scroll(0, -i32::from(*delta) * WHEEL_ROWS);
                true
            }
            _ => false,
        }
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::MouseEvent;
    use crate::document::LayoutDocument;
    use crate::loader::tests::LAYOUT;
    use image::{Rgba, RgbaImage};

    fn loaded_page() -> LoadedPage {
        LoadedPage {
            page: 1,
            file_name: "Fizika-0001".into(),
            document: LayoutDocument::from_slice(LAYOUT.as_bytes()).unwrap(),
            image: RgbaImage::from_pixel(120, 100, Rgba([255, 255, 255, 255])),
        }
    }

    fn ready_view() -> PageView {
        let mut view = PageView::new(Rect::new(0, 0, 120, 60));
        view.show_page(loaded_page());
        view
    }

    fn down(x: u16, y: u16) -> InputEvent {
        InputEvent::MouseDown(MouseEvent::at(x, y, Some(MouseButton::Left)))
    }

    fn drag(x: u16, y: u16) -> InputEvent {
        InputEvent::MouseMove(MouseEvent::at(x, y, Some(MouseButton::Left)))
    }

    fn up(x: u16, y: u16) -> InputEvent {
        InputEvent::MouseUp(MouseEvent::at(x, y, Some(MouseButton::Left)))
    }

    fn text_box(view: &PageView) -> [f32; 4] {
        view.editor().rects()[0].bbox()
    }

    #[test]
    fn test_show_page() {
        let view = ready_view();
        assert_eq!(view.state(), &ViewState::Ready);
        assert_eq!(view.editor().rects().len(), 2);
        assert_eq!((view.canvas().width(), view.canvas().height()), (120, 100));
        assert_eq!(view.viewport().zoom(), 1);
    }

    #[test]
    fn test_mouse_drag_moves_box() {
        let mut view = ready_view();
        // Cell (60, 22) shows image pixel (60, 44): inside the text box.
        assert!(view.handle_input(&down(60, 22)));
        assert_eq!(view.hover(), DragMode::Move);
        assert!(view.handle_input(&drag(65, 25)));
        assert!(view.handle_input(&up(65, 25)));

        assert_eq!(text_box(&view), [15.0, 26.0, 115.0, 76.0]);
        assert!(!view.editor().drag().mode.is_active());
    }

    #[test]
    fn test_hover_reports_handle() {
        let mut view = ready_view();
        // Right-edge midpoint of the text box is (110, 45).
        view.handle_input(&InputEvent::MouseMove(MouseEvent::at(110, 22, None)));
        assert_eq!(view.hover().to_string(), "resize right");
    }

    #[test]
    fn test_leaving_view_ends_drag() {
        let mut view = ready_view();
        view.handle_input(&down(60, 22));
        assert!(!view.handle_input(&drag(130, 22)));
        view.handle_input(&drag(70, 22));
        assert_eq!(text_box(&view), [10.0, 20.0, 110.0, 70.0]);
    }

    #[test]
    fn test_focus_loss_ends_drag() {
        let mut view = ready_view();
        view.handle_input(&down(60, 22));
        view.handle_input(&InputEvent::FocusLost);
        view.handle_input(&drag(70, 30));
        assert_eq!(text_box(&view), [10.0, 20.0, 110.0, 70.0]);
    }

    #[test]
    fn test_click_on_empty_space() {
        let mut view = ready_view();
        assert!(view.handle_input(&down(115, 45)));
        assert_eq!(view.hover(), DragMode::None);
        view.handle_input(&drag(100, 50));
        assert_eq!(text_box(&view), [10.0, 20.0, 110.0, 70.0]);
    }

    #[test]
    fn test_pointer_without_page_is_ignored() {
        let mut view = PageView::new(Rect::new(0, 0, 40, 20));
        assert!(!view.handle_input(&down(5, 5)));
        assert!(!view.handle_input(&drag(6, 6)));
        assert!(!view.handle_input(&up(6, 6)));
    }

    #[test]
    fn test_render_page_and_overlay() {
        let view = ready_view();
        let mut buffer = Buffer::new(120, 60);
        view.render(&mut buffer);

        // Row 10 covers image rows 20 and 21: the text box's top stroke.
        let edge = buffer.get(50, 10).unwrap();
        assert_eq!(edge.fg(), Rgb::from_u32(0x80_80_80));
        // Inside the box: white paper.
        let inside = buffer.get(50, 20).unwrap();
        assert_eq!((inside.fg(), inside.bg()), (Rgb::WHITE, Rgb::WHITE));
        // Below the image.
        assert_eq!(buffer.get(50, 55).unwrap().fg(), BACKDROP);
    }

    #[test]
    fn test_loading_and_error_messages() {
        let mut view = ready_view();
        let mut buffer = Buffer::new(120, 60);

        view.set_loading(2);
        assert!(view.page().is_none());
        assert!(view.editor().rects().is_empty());
        view.render(&mut buffer);
        assert!(buffer.row_text(30).contains("Loading page 2…"));

        view.show_error("http://x returned HTTP 404");
        view.render(&mut buffer);
        assert!(buffer.row_text(30).contains("returned HTTP 404"));
        assert_eq!(view.canvas().width(), 0);
    }

    #[test]
    fn test_zoom_keeps_pixel_tolerance() {
        let mut view = ready_view();
        assert!(view.zoom_out());
        // Cell (0, 8) shows image pixel (0, 32), 12 px below the nearest handle.
        view.handle_input(&InputEvent::MouseMove(MouseEvent::at(0, 8, None)));
        assert_eq!(view.hover(), DragMode::None);
        assert!(view.fit_width());
        assert_eq!(view.viewport().zoom(), 1);
    }

    #[test]
    fn test_fitted_page_boxes_can_be_moved() {
        let mut view = PageView::new(Rect::new(0, 0, 160, 50));
        view.show_page(LoadedPage {
            page: 3,
            file_name: "Fizika-0003".into(),
            document: LayoutDocument::from_slice(
                br#"{"pdf_info": [{"preproc_blocks": [{"type": "title", "bbox": [200, 400, 300, 430]}]}]}"#,
            )
            .unwrap(),
            image: RgbaImage::from_pixel(1224, 1584, Rgba([255, 255, 255, 255])),
        });
        assert_eq!(view.viewport().zoom(), 8);

        let moves = (0..50u16)
            .flat_map(|row| (0..160u16).map(move |col| (col, row)))
            .filter(|&(col, row)| {
                let p = view.viewport().cell_to_image(col, row).unwrap();
                view.editor().hover(p) == DragMode::Move
            })
            .count();
        assert!(moves > 0);

        // Cell (31, 26) shows image pixel (248, 416): inside, away from handles.
        assert!(view.handle_input(&down(31, 26)));
        assert_eq!(view.hover(), DragMode::Move);
        view.handle_input(&drag(33, 26));
        view.handle_input(&up(33, 26));
        assert_eq!(view.editor().rects()[0].bbox(), [216.0, 400.0, 316.0, 430.0]);

        // Two columns left of the moved box is 16 px away: nothing to grab.
        assert!(view.handle_input(&down(25, 26)));
        assert_eq!(view.editor().drag().mode, DragMode::None);
    }

    #[test]
    fn test_wheel_scrolls() {
        let mut view = PageView::new(Rect::new(0, 0, 120, 10));
        view.show_page(loaded_page());
        assert!(view.handle_input(&InputEvent::MouseScroll { x: 3, y: 3, delta: -1 }));
        assert_eq!(view.viewport().offset(), (0, 6));
    }
}
