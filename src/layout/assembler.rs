//! Line reconstruction from positioned fragments.

use super::{Fragment, Line, Span};
use crate::config::{ClusterPolicy, LayoutConfig};

/// Groups fragments into lines and builds each line's text and span table.
#[derive(Debug, Clone)]
pub struct LineAssembler {
    line_y_tolerance: f64,
    word_gap_tolerance: f64,
    policy: ClusterPolicy,
}

struct Cluster {
    anchor: f64,
    fragments: Vec<Fragment>,
}

impl LineAssembler {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            line_y_tolerance: config.line_y_tolerance,
            word_gap_tolerance: config.word_gap_tolerance,
            policy: config.cluster_policy,
        }
    }

    /// Assembles a page's fragments into lines.
    ///
    /// Lines come back ordered by anchor, largest first, which is the top
    /// of the page first; fragments within a line by x. Fragments with empty text carry nothing to match and are
    /// skipped.
    pub fn assemble(&self, fragments: Vec<Fragment>) -> Vec<Line> {
        let mut clusters: Vec<Cluster> = Vec::new();

        for fragment in fragments.into_iter().filter(|f| !f.text.is_empty()) {
            match self.find_cluster(&clusters, fragment.y) {
                Some(idx) => clusters[idx].fragments.push(fragment),
                None => clusters.push(Cluster {
                    anchor: fragment.y,
                    fragments: vec![fragment],
                }),
            }
        }

        // Stable sorts: ties keep creation and reading order
        clusters.sort_by(|a, b| b.anchor.total_cmp(&a.anchor));

        clusters
            .into_iter()
            .map(|mut cluster| {
                cluster.fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
                self.build_line(cluster)
            })
            .collect()
    }

    fn find_cluster(&self, clusters: &[Cluster], y: f64) -> Option<usize> {
        let within = |c: &Cluster| (c.anchor - y).abs() <= self.line_y_tolerance;

        match self.policy {
            ClusterPolicy::FirstFit => clusters.iter().position(within),
            ClusterPolicy::NearestFit => clusters
                .iter()
                .enumerate()
                .filter(|(_, c)| within(c))
                .min_by(|(_, a), (_, b)| {
                    (a.anchor - y).abs().total_cmp(&(b.anchor - y).abs())
                })
                .map(|(idx, _)| idx),
        }
    }

    fn build_line(&self, cluster: Cluster) -> Line {
        let mut text = String::new();
        let mut spans = Vec::with_capacity(cluster.fragments.len() * 2);

        for (idx, fragment) in cluster.fragments.iter().enumerate() {
            if idx > 0 {
                let prev = &cluster.fragments[idx - 1];
                if fragment.x - prev.right() > self.word_gap_tolerance {
                    let start = text.len();
                    text.push(' ');
                    spans.push(Span {
                        start,
                        end: text.len(),
                        fragment_index: None,
                    });
                }
            }

            let start = text.len();
            text.push_str(&fragment.text);
            spans.push(Span {
                start,
                end: text.len(),
                fragment_index: Some(idx),
            });
        }

        Line {
            y_reference: cluster.anchor,
            fragments: cluster.fragments,
            text,
            spans,
        }
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}
