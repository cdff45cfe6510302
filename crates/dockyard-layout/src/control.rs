//! Leaf dock items wrapping one piece of host content.

use std::fmt;

use dockyard_core::geometry::{Rect, Size};

use crate::item::DockStyle;

/// Host content embedded in a [`DockControl`].
///
/// The engine only needs to measure the content, place it, and show or hide
/// it. Everything else (painting, input) stays on the host side.
pub trait DockContent {
    /// Preferred size of the content.
    fn best_size(&self) -> Size;

    /// Move the content to `bounds` (window coordinates).
    fn set_bounds(&mut self, bounds: Rect);

    /// Show or hide the content.
    fn set_visible(&mut self, visible: bool);
}

/// Close hook: receives the control id and the `force` flag and returns
/// whether the close may proceed.
///
/// A `false` return vetoes the close unless `force` is set.
pub type CloseHandler = Box<dyn FnMut(&str, bool) -> bool>;

/// A dockable leaf.
///
/// Built with the `with_*` methods and handed to a
/// [`DockSizer`](crate::DockSizer) or [`DockTree`](crate::DockTree), which
/// then own it.
pub struct DockControl {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) user_name: bool,
    pub(crate) style: DockStyle,
    pub(crate) user_style: bool,
    pub(crate) visible: bool,
    pub(crate) locked: bool,
    pub(crate) resizable: bool,
    pub(crate) closeable: bool,
    /// Tab rectangle inside the owning region's tab strip.
    pub(crate) drag_bounds: Rect,
    /// Hint carried while the control is outside a tree.
    pub(crate) size_hint: Size,
    pub(crate) content: Option<Box<dyn DockContent>>,
    pub(crate) on_close: Option<CloseHandler>,
}

impl DockControl {
    /// Create a visible, resizable, closeable control whose name is its id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            user_name: false,
            style: DockStyle::Tab,
            user_style: false,
            visible: true,
            locked: false,
            resizable: true,
            closeable: true,
            drag_bounds: Rect::default(),
            size_hint: Size::new(-1, -1),
            content: None,
            on_close: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: DockStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl DockContent + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    #[must_use]
    pub fn with_boxed_content(mut self, content: Box<dyn DockContent>) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub fn with_close_handler(
        mut self,
        handler: impl FnMut(&str, bool) -> bool + 'static,
    ) -> Self {
        self.on_close = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    #[must_use]
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[must_use]
    pub fn with_closeable(mut self, closeable: bool) -> Self {
        self.closeable = closeable;
        self
    }

    /// Initial size hint, used before the first layout pass.
    #[must_use]
    pub fn with_size_hint(mut self, size: Size) -> Self {
        self.size_hint = size;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn user_name(&self) -> bool {
        self.user_name
    }

    #[must_use]
    pub const fn style(&self) -> DockStyle {
        self.style
    }

    #[must_use]
    pub const fn user_style(&self) -> bool {
        self.user_style
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub const fn is_resizable(&self) -> bool {
        self.resizable
    }

    #[must_use]
    pub const fn is_closeable(&self) -> bool {
        self.closeable
    }

    #[must_use]
    pub const fn drag_bounds(&self) -> Rect {
        self.drag_bounds
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Rename the control on behalf of the user.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.user_name = true;
    }

    /// Restyle the control on behalf of the user.
    pub fn set_style(&mut self, style: DockStyle) {
        self.style = style;
        self.user_style = true;
    }

    pub fn toggle_lock(&mut self) {
        self.locked = !self.locked;
    }

    /// Take the content out, leaving the control empty.
    pub fn take_content(&mut self) -> Option<Box<dyn DockContent>> {
        self.content.take()
    }

    /// Natural size: the content's preferred size, or the carried hint when
    /// there is no content.
    pub(crate) fn natural_size(&self, hint: Size) -> Size {
        match &self.content {
            Some(content) => content.best_size(),
            None => hint,
        }
        .non_negative()
    }

    pub(crate) fn place(&mut self, bounds: Rect) {
        if let Some(content) = self.content.as_mut() {
            content.set_bounds(bounds);
        }
    }

    pub(crate) fn show(&mut self, visible: bool) {
        if let Some(content) = self.content.as_mut() {
            content.set_visible(visible);
        }
    }

    /// Ask the close handler for permission. `force` overrides a veto.
    pub(crate) fn request_close(&mut self, force: bool) -> bool {
        let allowed = match self.on_close.as_mut() {
            Some(handler) => handler(&self.id, force),
            None => true,
        };
        allowed || force
    }
}

impl fmt::Debug for DockControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockControl")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("style", &self.style)
            .field("visible", &self.visible)
            .field("locked", &self.locked)
            .field("resizable", &self.resizable)
            .field("closeable", &self.closeable)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}
