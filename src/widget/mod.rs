//! Widgets: the page view and the status bar.
//!
//! Both implement [`Widget`]. The app splits the screen between them and
//! redraws the frame whenever either reports [`Widget::needs_redraw`].

mod page_view;
mod status_bar;
mod traits;

pub use page_view::{PageView, ViewState, BACKDROP, WHEEL_ROWS};
pub use status_bar::{StatusBar, StatusBarConfig};
pub use traits::Widget;
