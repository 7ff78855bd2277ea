//! Capture of the text content of one element.

use crate::error::ScraperError;

type Delivery<C> = Box<dyn FnOnce(&mut C, String) -> Result<(), ScraperError>>;

/// Collects character data from the element that was open when the
/// recorder was created, including all of its descendants.
///
/// Nesting is tracked with a depth counter relative to the creation point,
/// not the document depth. When the owning element closes the collected
/// text is [`sanitize`]d and passed to the delivery callback exactly once.
pub struct TextRecorder<C> {
    depth: i32,
    buffer: String,
    deliver: Option<Delivery<C>>,
}

impl<C> TextRecorder<C> {
    pub fn new(deliver: impl FnOnce(&mut C, String) -> Result<(), ScraperError> + 'static) -> Self {
        Self {
            depth: 0,
            buffer: String::new(),
            deliver: Some(Box::new(deliver)),
        }
    }

    pub fn start_element(&mut self) {
        self.depth += 1;
    }

    pub fn characters(&mut self, text: &str) {
        if self.depth >= 0 {
            self.buffer.push_str(text);
        }
    }

    /// Tracks a tag-close. Returns `Ok(true)` when this close ended the
    /// recording; the owner should drop the recorder at that point.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by the delivery callback.
    pub fn end_element(&mut self, ctx: &mut C) -> Result<bool, ScraperError> {
        self.depth -= 1;
        if self.depth >= 0 {
            return Ok(false);
        }
        if let Some(deliver) = self.deliver.take() {
            let text = sanitize(&std::mem::take(&mut self.buffer));
            deliver(ctx, text)?;
        }
        Ok(true)
    }
}

/// Collapses every run of whitespace (including non-breaking spaces) into
/// a single space and trims both ends.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
