//! Line assembly and box mapping over hand-built fragment sets.

use phone_redactor::config::{ClusterPolicy, LayoutConfig};
use phone_redactor::layout::{Fragment, GeometryMapper, Line, LineAssembler, PageSize, Span};
use phone_redactor::{PatternMatcher, PhoneMatcher};

fn fragment_sets() -> Vec<Vec<Fragment>> {
    vec![
        vec![],
        vec![Fragment::new("alone", 10.0, 50.0, 30.0, 10.0)],
        vec![
            Fragment::new("555", 0.0, 100.0, 20.0, 10.0),
            Fragment::new("-123-4567", 25.0, 100.0, 60.0, 10.0),
        ],
        // Touching fragments, out of order, on two lines
        vec![
            Fragment::new("4567", 60.0, 200.5, 24.0, 10.0),
            Fragment::new("Call", 0.0, 300.0, 24.0, 10.0),
            Fragment::new("555-123-", 12.0, 200.0, 48.0, 10.0),
            Fragment::new("now", 30.0, 299.0, 18.0, 10.0),
        ],
        // Overlapping x and an empty fragment
        vec![
            Fragment::new("ab", 10.0, 10.0, 20.0, 8.0),
            Fragment::new("", 12.0, 10.0, 0.0, 8.0),
            Fragment::new("cd", 5.0, 11.0, 20.0, 8.0),
        ],
    ]
}

fn assert_partition(line: &Line) {
    let mut cursor = 0;
    for span in &line.spans {
        assert_eq!(span.start, cursor, "gap before span in {:?}", line.text);
        assert!(span.end > span.start);
        match span.fragment_index {
            Some(idx) => assert_eq!(&line.text[span.start..span.end], line.fragments[idx].text),
            None => assert_eq!(&line.text[span.start..span.end], " "),
        }
        cursor = span.end;
    }
    assert_eq!(cursor, line.text.len());
}

#[test]
fn test_spans_partition_every_line() {
    for policy in [ClusterPolicy::FirstFit, ClusterPolicy::NearestFit] {
        let assembler = LineAssembler::new(&LayoutConfig {
            cluster_policy: policy,
            ..LayoutConfig::default()
        });
        for fragments in fragment_sets() {
            for line in assembler.assemble(fragments) {
                assert_partition(&line);
            }
        }
    }
}

#[test]
fn test_lines_sorted_and_fragments_ordered() {
    for fragments in fragment_sets() {
        let lines = LineAssembler::default().assemble(fragments);
        for pair in lines.windows(2) {
            assert!(pair[0].y_reference >= pair[1].y_reference);
        }
        for line in &lines {
            for pair in line.fragments.windows(2) {
                assert!(pair[0].x <= pair[1].x);
            }
        }
    }
}

#[test]
fn test_scenario_line() {
    let lines = LineAssembler::default().assemble(fragment_sets().remove(2));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "555 -123-4567");
    assert_eq!(
        lines[0].spans[1],
        Span {
            start: 3,
            end: 4,
            fragment_index: None
        }
    );
}

#[test]
fn test_split_number_matches_across_fragments() {
    let lines = LineAssembler::default().assemble(fragment_sets().remove(3));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "Call now");
    assert_eq!(lines[1].text, "555-123-4567");

    let matches = PhoneMatcher::new().find_matches(&lines[1].text);
    assert_eq!(matches.len(), 1);

    let area = GeometryMapper::default()
        .map_match_to_box(
            &lines[1],
            &matches[0],
            PageSize::new(612.0, 792.0),
            PageSize::new(612.0, 792.0),
        )
        .unwrap();
    assert!((area.x - 10.5).abs() < 1e-9);
    assert!((area.width - 75.0).abs() < 1e-9);
}

#[test]
fn test_source_box_contains_matched_fragments() {
    let mapper = GeometryMapper::default();
    let matcher = PhoneMatcher::new();

    for fragments in fragment_sets() {
        for line in LineAssembler::default().assemble(fragments) {
            for m in matcher.find_matches(&line.text) {
                let source_box = mapper.source_box(&line, &m).unwrap();
                for span in line.spans.iter().filter(|s| s.overlaps(m.start, m.end)) {
                    let Some(idx) = span.fragment_index else { continue };
                    let f = &line.fragments[idx];
                    assert!(source_box.min_x <= f.x);
                    assert!(source_box.max_x >= f.x + f.width);
                    assert!(source_box.top_y >= f.y);
                    assert!(source_box.bottom_y <= f.y - f.height);
                }
            }
        }
    }
}

#[test]
fn test_equal_sizes_keep_the_box() {
    let mapper = GeometryMapper::default();
    let size = PageSize::new(595.0, 842.0);

    for fragments in fragment_sets() {
        for line in LineAssembler::default().assemble(fragments) {
            let m = phone_redactor::Match {
                start: 0,
                end: line.text.len(),
                matched_text: line.text.clone(),
            };
            let source_box = mapper.source_box(&line, &m).unwrap();
            let area = mapper.map_match_to_box(&line, &m, size, size).unwrap();

            assert!((area.x - source_box.min_x).abs() < 1e-9);
            assert!((area.width - (source_box.max_x - source_box.min_x)).abs() < 1e-9);
            assert!((area.y - source_box.bottom_y).abs() < 1e-9);
            assert!((area.y + area.height - source_box.top_y).abs() < 1e-9);
        }
    }
}

#[test]
fn test_cluster_policies_diverge_on_ambiguous_fragment() {
    // Anchors 100 and 103.5; a fragment at 101.9 is within 2.0 of both
    let fragments = vec![
        Fragment::new("upper", 0.0, 100.0, 30.0, 10.0),
        Fragment::new("lower", 0.0, 103.5, 30.0, 10.0),
        Fragment::new("555-123-4567", 40.0, 101.9, 70.0, 10.0),
    ];

    let first_fit = LineAssembler::default().assemble(fragments.clone());
    let nearest = LineAssembler::new(&LayoutConfig {
        cluster_policy: ClusterPolicy::NearestFit,
        ..LayoutConfig::default()
    })
    .assemble(fragments);

    let text_of = |lines: &[Line], anchor: f64| {
        lines
            .iter()
            .find(|l| l.y_reference == anchor)
            .map(|l| l.text.clone())
            .unwrap()
    };
    assert_eq!(text_of(&first_fit, 100.0), "upper 555-123-4567");
    assert_eq!(text_of(&nearest, 103.5), "lower 555-123-4567");
}
