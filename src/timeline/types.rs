use crate::config::TitleStyle;
use crate::layout::PlacedClip;

/// Seconds a title takes to fade in, and again to fade out
pub const TITLE_FADE: f64 = 0.5;

/// A clip positioned on the timeline
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub clip: PlacedClip,

    /// When the clip becomes fully visible (seconds)
    pub start: f64,

    /// Crossfade leading into this clip (0 for the first clip)
    pub fade_in: f64,

    /// Crossfade trailing out of this clip (0 for the last clip)
    pub fade_out: f64,
}

impl TimelineEntry {
    pub fn hold_end(&self) -> f64 {
        self.start + self.clip.duration
    }

    /// First instant any part of the clip is on screen
    pub fn visible_from(&self) -> f64 {
        self.start - self.fade_in
    }

    pub fn visible_until(&self) -> f64 {
        self.hold_end() + self.fade_out
    }
}

/// Crossfade-out of one clip overlapping the crossfade-in of the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionDirective {
    pub outgoing: usize,
    pub incoming: usize,
    pub start: f64,
    pub duration: f64,
}

/// A contiguous span of output video
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// One clip, fully opaque
    Hold {
        clip: usize,
        start: f64,
        duration: f64,
    },

    /// `from` ramps 1 -> 0 while `to` ramps 0 -> 1
    Crossfade {
        from: usize,
        to: usize,
        start: f64,
        duration: f64,
    },
}

impl Segment {
    pub fn start(&self) -> f64 {
        match *self {
            Self::Hold { start, .. } | Self::Crossfade { start, .. } => start,
        }
    }

    pub fn duration(&self) -> f64 {
        match *self {
            Self::Hold { duration, .. } | Self::Crossfade { duration, .. } => duration,
        }
    }

    pub fn end(&self) -> f64 {
        self.start() + self.duration()
    }
}

/// When and how a title is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCue {
    pub clip: usize,
    pub text: String,
    pub style: TitleStyle,
    pub start: f64,
    pub end: f64,

    /// Length of each of the fade-in and fade-out ramps
    pub fade: f64,
}

/// Ordered clips plus the transitions between them
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub(crate) entries: Vec<TimelineEntry>,
    pub(crate) transitions: Vec<TransitionDirective>,
}

impl Timeline {
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn transitions(&self) -> &[TransitionDirective] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the finished video in seconds
    pub fn total_duration(&self) -> f64 {
        self.entries.last().map(TimelineEntry::hold_end).unwrap_or(0.0)
    }

    /// Holds and crossfades covering the whole timeline, in order
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.entries.len() + self.transitions.len());
        let mut transitions = self.transitions.iter().peekable();

        for (index, entry) in self.entries.iter().enumerate() {
            segments.push(Segment::Hold {
                clip: index,
                start: entry.start,
                duration: entry.clip.duration,
            });

            if let Some(t) = transitions.next_if(|t| t.outgoing == index) {
                segments.push(Segment::Crossfade {
                    from: t.outgoing,
                    to: t.incoming,
                    start: t.start,
                    duration: t.duration,
                });
            }
        }

        segments
    }

    /// Title windows for every titled clip
    ///
    /// A title appears with its clip, including the incoming crossfade, and
    /// is gone before the clip starts fading out.
    pub fn title_cues(&self, title_duration: f64) -> Vec<TitleCue> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match &entry.clip.kind {
                crate::layout::ClipKind::Titled { text, style } => {
                    let start = entry.visible_from();
                    let end = (start + title_duration).min(entry.hold_end());
                    Some(TitleCue {
                        clip: index,
                        text: text.clone(),
                        style: style.clone(),
                        start,
                        end,
                        fade: TITLE_FADE.min((end - start) / 2.0),
                    })
                }
                crate::layout::ClipKind::Plain => None,
            })
            .collect()
    }
}
