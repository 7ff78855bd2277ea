//! Element-scoped exit hooks without building a tree.

/// Stack of per-element callback lists.
///
/// Call [`start_element`](Self::start_element) on every tag-open and
/// [`end_element`](Self::end_element) on every tag-close. A callback
/// registered with [`add`](Self::add) runs when the element that is open
/// at registration time closes, however deep the document is at that
/// point. Callbacks get mutable access to the owner's state `C`.
pub struct ScopeWatcher<C> {
    frames: Vec<Vec<Box<dyn FnOnce(&mut C)>>>,
}

impl<C> ScopeWatcher<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn start_element(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Registers `callback` on the innermost open element.
    ///
    /// Ignored when no element is open.
    pub fn add(&mut self, callback: impl FnOnce(&mut C) + 'static) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(Box::new(callback));
        }
    }

    /// Closes the innermost element and runs its callbacks in registration
    /// order. A close without a matching open is ignored.
    pub fn end_element(&mut self, ctx: &mut C) {
        if let Some(frame) = self.frames.pop() {
            for callback in frame {
                callback(ctx);
            }
        }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl<C> Default for ScopeWatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}
