use tracing::{debug, info};

use crate::layout::PlacedClip;
use crate::timeline::types::{Timeline, TimelineEntry, TransitionDirective};

/// Builds a [`Timeline`] from clips in display order
pub struct Sequencer {
    crossfade: f64,
}

impl Sequencer {
    pub fn new(crossfade: f64) -> Self {
        Self {
            crossfade: crossfade.max(0.0),
        }
    }

    /// Pair every clip with its successor
    ///
    /// Clip *i* fades out over the crossfade while clip *i + 1* fades in over
    /// the same span. The last clip has no outgoing transition. A zero
    /// crossfade produces hard cuts.
    pub fn build(&self, clips: Vec<PlacedClip>) -> Timeline {
        let count = clips.len();
        let mut entries = Vec::with_capacity(count);
        let mut transitions = Vec::with_capacity(count.saturating_sub(1));
        let mut cursor = 0.0;

        for (index, clip) in clips.into_iter().enumerate() {
            let is_first = index == 0;
            let is_last = index + 1 == count;
            let duration = clip.duration;

            entries.push(TimelineEntry {
                clip,
                start: cursor,
                fade_in: if is_first { 0.0 } else { self.crossfade },
                fade_out: if is_last { 0.0 } else { self.crossfade },
            });

            cursor += duration;

            if !is_last {
                if self.crossfade > 0.0 {
                    transitions.push(TransitionDirective {
                        outgoing: index,
                        incoming: index + 1,
                        start: cursor,
                        duration: self.crossfade,
                    });
                }
                cursor += self.crossfade;
            }
        }

        let timeline = Timeline { entries, transitions };

        info!(
            "Timeline: {} clips, {} crossfades, {:.2}s",
            timeline.len(),
            timeline.transitions.len(),
            timeline.total_duration()
        );
        for entry in timeline.entries() {
            debug!(
                "   {:>8.2}s - {:>8.2}s  {}",
                entry.visible_from(),
                entry.visible_until(),
                entry.clip.source.file_name
            );
        }

        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TitleStyle;
    use crate::layout::{ClipKind, Placement};
    use crate::timeline::types::{Segment, TITLE_FADE};
    use crate::assets::ImageAsset;
    use std::path::PathBuf;

    fn clip(name: &str, duration: f64, title: Option<&str>) -> PlacedClip {
        PlacedClip {
            source: ImageAsset {
                path: PathBuf::from(name),
                file_name: name.to_string(),
                width: 100,
                height: 100,
            },
            duration,
            placement: Placement {
                x: 0,
                y: 0,
                width: 100,
                height: 100,
                scale: 1.0,
            },
            kind: match title {
                Some(text) => ClipKind::Titled {
                    text: text.to_string(),
                    style: TitleStyle::default(),
                },
                None => ClipKind::Plain,
            },
        }
    }

    fn clips(names: &[&str], duration: f64) -> Vec<PlacedClip> {
        names.iter().map(|n| clip(n, duration, None)).collect()
    }

    #[test]
    fn test_four_images_fifteen_seconds() {
        let timeline = Sequencer::new(1.0).build(clips(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"], 3.0));
        assert_eq!(timeline.total_duration(), 15.0);
        assert_eq!(timeline.transitions().len(), 3);
    }

    #[test]
    fn test_total_duration_formula() {
        for n in 1..=7usize {
            for (d, c) in [(3.0, 1.0), (2.5, 0.5), (4.0, 3.0), (1.0, 0.0)] {
                let names: Vec<String> = (0..n).map(|i| format!("{:02}.png", i)).collect();
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                let timeline = Sequencer::new(c).build(clips(&names, d));
                let expected = d * n as f64 + c * (n - 1) as f64;
                assert!((timeline.total_duration() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_single_image_has_no_transitions() {
        let timeline = Sequencer::new(2.0).build(clips(&["only.jpg"], 3.0));
        assert!(timeline.transitions().is_empty());
        assert_eq!(timeline.total_duration(), 3.0);
        assert_eq!(timeline.entries()[0].fade_in, 0.0);
        assert_eq!(timeline.entries()[0].fade_out, 0.0);
    }

    #[test]
    fn test_transition_pairing() {
        let timeline = Sequencer::new(1.0).build(clips(&["a.jpg", "b.jpg", "c.jpg"], 3.0));

        let pairs: Vec<_> = timeline
            .transitions()
            .iter()
            .map(|t| (t.outgoing, t.incoming))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);

        let entries = timeline.entries();
        assert_eq!(entries[0].fade_in, 0.0);
        assert_eq!(entries[0].fade_out, 1.0);
        assert_eq!(entries[1].fade_in, 1.0);
        assert_eq!(entries[2].fade_out, 0.0);

        // Outgoing and incoming clips overlap for exactly the crossfade
        assert_eq!(entries[0].visible_until(), entries[1].start);
        assert_eq!(entries[1].visible_from(), entries[0].hold_end());
        assert_eq!(entries[0].visible_until() - entries[0].hold_end(), 1.0);
    }

    #[test]
    fn test_segments_cover_timeline_without_gaps() {
        let timeline = Sequencer::new(1.0).build(clips(&["a.jpg", "b.jpg", "c.jpg"], 3.0));
        let segments = timeline.segments();

        assert_eq!(segments.len(), 5);
        assert!(matches!(segments[0], Segment::Hold { clip: 0, .. }));
        assert!(matches!(segments[1], Segment::Crossfade { from: 0, to: 1, .. }));
        assert!(matches!(segments[4], Segment::Hold { clip: 2, .. }));

        let mut cursor = 0.0;
        for segment in &segments {
            assert!((segment.start() - cursor).abs() < 1e-9);
            cursor = segment.end();
        }
        assert!((cursor - timeline.total_duration()).abs() < 1e-9);
    }

    #[test]
    fn test_zero_crossfade_is_hard_cut() {
        let timeline = Sequencer::new(0.0).build(clips(&["a.jpg", "b.jpg"], 2.0));
        assert!(timeline.transitions().is_empty());
        assert_eq!(timeline.segments().len(), 2);
        assert_eq!(timeline.total_duration(), 4.0);
    }

    #[test]
    fn test_order_is_preserved() {
        let timeline = Sequencer::new(1.0).build(clips(&["a.jpg", "b.jpg", "c.jpg"], 1.0));
        let names: Vec<_> = timeline
            .entries()
            .iter()
            .map(|e| e.clip.source.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_title_cue_only_on_titled_clip() {
        let timeline = Sequencer::new(1.0).build(vec![
            clip("a.jpg", 3.0, Some("Summer Trip")),
            clip("b.jpg", 3.0, None),
        ]);

        let cues = timeline.title_cues(2.0);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].clip, 0);
        assert_eq!(cues[0].text, "Summer Trip");
        assert_eq!((cues[0].start, cues[0].end), (0.0, 2.0));
        assert_eq!(cues[0].fade, TITLE_FADE);
    }

    #[test]
    fn test_title_ends_before_crossfade_out() {
        let timeline = Sequencer::new(1.0).build(vec![
            clip("a.jpg", 3.0, None),
            clip("b.jpg", 3.0, Some("Later")),
            clip("c.jpg", 3.0, None),
        ]);

        let cues = timeline.title_cues(10.0);
        let entry = &timeline.entries()[1];
        assert_eq!(cues[0].start, entry.visible_from());
        assert_eq!(cues[0].start, 3.0);
        assert_eq!(cues[0].end, entry.hold_end());
        assert_eq!(cues[0].end, 7.0);
    }

    #[test]
    fn test_short_title_window_shrinks_fades() {
        let timeline = Sequencer::new(1.0).build(vec![clip("a.jpg", 0.6, Some("Quick"))]);
        let cues = timeline.title_cues(3.0);
        assert!((cues[0].fade - 0.3).abs() < 1e-9);
    }
}
