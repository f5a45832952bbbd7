//! The one-shot attachment slot filled by `/load`.

use crate::types::FileReference;

/// Holds at most one uploaded file waiting to be sent with the next message.
///
/// The slot is filled by a successful `/load` and emptied by [`take`](Self::take)
/// as soon as the next message goes out, whether or not that send succeeds.
#[derive(Debug, Default)]
pub struct AttachmentSlot {
    pending: Option<FileReference>,
}

impl AttachmentSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no attachment is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// The pending attachment, if any.
    pub fn pending(&self) -> Option<&FileReference> {
        self.pending.as_ref()
    }

    /// Stores `reference`, returning the unconsumed attachment it replaces.
    pub fn set(&mut self, reference: FileReference) -> Option<FileReference> {
        self.pending.replace(reference)
    }

    /// Removes and returns the pending attachment.
    pub fn take(&mut self) -> Option<FileReference> {
        self.pending.take()
    }
}
