//! Match-to-rectangle mapping.

use super::{DestinationBox, Line, PageSize, SourceBox};
use crate::config::LayoutConfig;
use crate::domain::Match;

/// Maps matches in a line string to boxes on the destination page.
#[derive(Debug, Clone)]
pub struct GeometryMapper {
    padding: f64,
}

impl GeometryMapper {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            padding: config.box_padding,
        }
    }

    /// Union box of every fragment whose span overlaps the match, padded.
    ///
    /// Returns `None` when only synthesized spaces overlap.
    pub fn source_box(&self, line: &Line, m: &Match) -> Option<SourceBox> {
        let mut hit = line
            .spans
            .iter()
            .filter(|span| span.overlaps(m.start, m.end))
            .filter_map(|span| span.fragment_index)
            .filter_map(|idx| line.fragments.get(idx))
            .peekable();

        hit.peek()?;

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut top = f64::NEG_INFINITY;
        let mut bottom = f64::INFINITY;
        for fragment in hit {
            min_x = min_x.min(fragment.x);
            max_x = max_x.max(fragment.right());
            top = top.max(fragment.y);
            bottom = bottom.min(fragment.y - fragment.height);
        }

        Some(SourceBox {
            min_x: min_x - self.padding,
            max_x: max_x + self.padding,
            top_y: top + self.padding,
            bottom_y: bottom - self.padding,
        })
    }

    /// Scales a source box onto the destination page. Both spaces put the
    /// origin at the bottom-left, so only scaling is needed; each axis is
    /// scaled independently.
    pub fn to_destination(
        &self,
        source_box: &SourceBox,
        source: PageSize,
        dest: PageSize,
    ) -> DestinationBox {
        let scale_x = dest.width / source.width;
        let scale_y = dest.height / source.height;

        let width = (source_box.max_x - source_box.min_x) * scale_x;
        let height = (source_box.top_y - source_box.bottom_y) * scale_y;
        let top_from_bottom = source_box.top_y * scale_y;

        DestinationBox {
            x: source_box.min_x * scale_x,
            y: top_from_bottom - height,
            width,
            height,
        }
    }

    /// Both steps together. A degenerate source viewport yields `None`.
    pub fn map_match_to_box(
        &self,
        line: &Line,
        m: &Match,
        source: PageSize,
        dest: PageSize,
    ) -> Option<DestinationBox> {
        if source.is_degenerate() {
            return None;
        }
        let source_box = self.source_box(line, m)?;
        Some(self.to_destination(&source_box, source, dest))
    }
}

impl Default for GeometryMapper {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}
