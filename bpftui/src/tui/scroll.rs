//! Scrollable viewport over long-form content
//!
//! Tracks a line offset into content taller than the screen. The offset
//! never exceeds `content_len - height`, so the last page stays full.

use super::keys::Action;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollRegion {
    offset: usize,
    content_len: usize,
    height: usize,
}

impl ScrollRegion {
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp();
    }

    pub fn set_content_len(&mut self, len: usize) {
        self.content_len = len;
        self.clamp();
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the window the least distance that puts `line` on screen
    pub fn reveal(&mut self, line: usize) {
        let height = self.height.max(1);
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
        self.clamp();
    }

    fn max_offset(&self) -> usize {
        self.content_len.saturating_sub(self.height.max(1))
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    /// Apply a scrolling action; returns whether the action was a scroll key
    pub fn handle(&mut self, action: Action) -> bool {
        let page = self.height.max(1);
        match action {
            Action::Up => self.offset = self.offset.saturating_sub(1),
            Action::Down => self.offset += 1,
            Action::PageUp => self.offset = self.offset.saturating_sub(page),
            Action::PageDown => self.offset += page,
            Action::Top => self.offset = 0,
            Action::Bottom => self.offset = self.max_offset(),
            _ => return false,
        }
        self.clamp();
        true
    }
}
