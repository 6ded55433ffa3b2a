use crate::layers::marker::MarkerId;

/// The single info popup shared by all markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePopup {
    pub anchor: MarkerId,
    pub content: String,
}

/// Holds the shared popup; opening it elsewhere replaces the content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupSlot {
    active: Option<ActivePopup>,
}

impl PopupSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, anchor: MarkerId, content: impl Into<String>) {
        self.active = Some(ActivePopup {
            anchor,
            content: content.into(),
        });
    }

    /// Returns the popup that was open, if any
    pub fn close(&mut self) -> Option<ActivePopup> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&ActivePopup> {
        self.active.as_ref()
    }

    pub fn is_anchored_to(&self, marker: MarkerId) -> bool {
        self.active.as_ref().is_some_and(|p| p.anchor == marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_replaces_content() {
        let mut slot = PopupSlot::new();
        assert!(slot.active().is_none());

        slot.open(MarkerId(0), "first");
        slot.open(MarkerId(3), "second");

        let active = slot.active().unwrap();
        assert_eq!(active.anchor, MarkerId(3));
        assert_eq!(active.content, "second");
        assert!(slot.is_anchored_to(MarkerId(3)));
        assert!(!slot.is_anchored_to(MarkerId(0)));
    }

    #[test]
    fn test_close() {
        let mut slot = PopupSlot::new();
        slot.open(MarkerId(1), "x");
        assert_eq!(slot.close().map(|p| p.anchor), Some(MarkerId(1)));
        assert!(slot.close().is_none());
        assert!(slot.active().is_none());
    }
}
