//! Drag-and-drop payload and insertion index.
//!
//! Palette items carry their block key under a custom MIME type. Drop
//! targets accept only that type and pick an insertion index from the
//! pointer position relative to the blocks already rendered.

use mc_core::BlockKey;

/// MIME type under which palette drags carry a block key.
pub const DROP_MIME: &str = "application/x-mailcraft-block";

/// Whether a drag with these data types can be dropped on the canvas.
pub fn accepts_drop<S: AsRef<str>>(types: &[S]) -> bool {
    types.iter().any(|t| t.as_ref() == DROP_MIME)
}

/// Decoded drop data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropPayload {
    pub key: BlockKey,
}

impl DropPayload {
    /// Parse drag data. Unknown keys are rejected rather than falling back
    /// to a text block.
    pub fn from_data(data: &str) -> Option<Self> {
        BlockKey::parse(data.trim()).map(|key| Self { key })
    }
}

/// Vertical extent of one rendered block, relative to its drop container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBand {
    pub top: f64,
    pub height: f64,
}

impl BlockBand {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Insertion index for a drop at container-relative `y`.
///
/// Upper half of a block inserts before it, lower half after it. Above the
/// first block is 0; gaps between blocks and anything below the last block
/// fall through to the end.
pub fn drop_index(y: f64, bands: &[BlockBand]) -> usize {
    let Some(first) = bands.first() else {
        return 0;
    };
    if y < first.top {
        return 0;
    }
    let mut target = bands.len();
    for (idx, band) in bands.iter().enumerate() {
        if y >= band.top && y < band.center() {
            target = idx;
        } else if y >= band.center() && y < band.bottom() {
            target = idx + 1;
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bands() -> Vec<BlockBand> {
        vec![
            BlockBand::new(10.0, 40.0),
            BlockBand::new(60.0, 20.0),
            BlockBand::new(80.0, 100.0),
        ]
    }

    #[test]
    fn mime_filter() {
        assert!(accepts_drop(&["text/plain", DROP_MIME]));
        assert!(!accepts_drop(&["text/plain"]));
        assert!(!accepts_drop::<&str>(&[]));
    }

    #[test]
    fn payload_parses_known_keys_only() {
        assert_eq!(
            DropPayload::from_data("columns-3").map(|p| p.key),
            Some(BlockKey::Columns3)
        );
        assert_eq!(DropPayload::from_data("carousel"), None);
    }

    #[test]
    fn halves_pick_before_or_after() {
        let b = bands();
        assert_eq!(drop_index(0.0, &b), 0);
        assert_eq!(drop_index(20.0, &b), 0);
        assert_eq!(drop_index(35.0, &b), 1);
        assert_eq!(drop_index(65.0, &b), 1);
        assert_eq!(drop_index(75.0, &b), 2);
        assert_eq!(drop_index(150.0, &b), 3);
    }

    #[test]
    fn gaps_and_overflow_append() {
        let b = bands();
        // Between the first and second band.
        assert_eq!(drop_index(55.0, &b), 3);
        assert_eq!(drop_index(500.0, &b), 3);
        assert_eq!(drop_index(42.0, &[]), 0);
    }
}
