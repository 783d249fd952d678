//! Frame-number bookkeeping for a live stream.

/// Classification of a frame number against the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceCheck {
    First,
    Advanced { skipped: u32 },
    Repeated,
    /// The frame number went backwards. Logged, not fatal.
    Regressed { previous: i32 },
}

/// Tracks the last frame number seen on a stream.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    last: Option<i32>,
    regressions: usize,
    skipped: u64,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, number: i32) -> SequenceCheck {
        let check = match self.last {
            None => SequenceCheck::First,
            Some(prev) if number == prev => SequenceCheck::Repeated,
            Some(prev) if number > prev => {
                let skipped = number.abs_diff(prev) - 1;
                self.skipped += u64::from(skipped);
                SequenceCheck::Advanced { skipped }
            }
            Some(prev) => {
                self.regressions += 1;
                log::warn!("frame number went backwards: {prev} -> {number}");
                SequenceCheck::Regressed { previous: prev }
            }
        };
        self.last = Some(number);
        check
    }

    #[inline]
    pub fn last(&self) -> Option<i32> {
        self.last
    }

    /// How many times the frame number decreased.
    #[inline]
    pub fn regressions(&self) -> usize {
        self.regressions
    }

    /// Frame numbers jumped over on forward steps.
    #[inline]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
