//! Correspondence search of the needle inside a marker haystack.

use lps_core::Marker;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::model::NeedleModel;

/// Search tolerance settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Full width of the distance tolerance window, in meters. Half of it is
    /// applied on each side of a needle distance.
    pub search_margin: f32,
    /// Never assign one haystack marker to two distance slots of the same
    /// origin candidate.
    ///
    /// Off by default: without it a single marker may fill several slots,
    /// which yields a geometrically impossible but still reported pose.
    pub unique_markers: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search_margin: 0.02,
            unique_markers: false,
        }
    }
}

impl SearchParams {
    #[inline]
    pub fn half_margin(&self) -> f32 {
        0.5 * self.search_margin
    }
}

/// Haystack marker chosen for one needle distance slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotMatch {
    /// Index into the haystack.
    pub index: usize,
    pub marker: Marker,
    /// Realized origin-to-marker distance.
    pub distance: f32,
    /// `|distance - needle distance|`.
    pub error: f32,
}

/// An accepted needle hypothesis: an origin plus one marker per slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeedleMatch {
    pub origin_index: usize,
    pub origin: Marker,
    /// One entry per needle slot, in slot order.
    pub slots: Vec<SlotMatch>,
}

impl NeedleMatch {
    /// Haystack indices of the match: origin first, then slots in order.
    pub fn indices(&self) -> Vec<usize> {
        std::iter::once(self.origin_index)
            .chain(self.slots.iter().map(|s| s.index))
            .collect()
    }

    /// Whether some haystack marker fills more than one slot.
    pub fn has_shared_markers(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .any(|(j, s)| self.slots[..j].iter().any(|p| p.index == s.index))
    }
}

/// Find the first origin candidate whose distance slots can all be filled.
///
/// Origins are tried in haystack order and the first complete candidate is
/// returned without looking further. Within a slot, the marker with the
/// smallest distance error wins; on equal error the earlier marker is kept.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(haystack = haystack.len(), slots = needle.slot_count()))
)]
pub fn find_needle(
    haystack: &[Marker],
    needle: &NeedleModel,
    params: &SearchParams,
) -> Option<NeedleMatch> {
    let half_margin = params.half_margin();

    for (origin_index, origin) in haystack.iter().enumerate() {
        if let Some(slots) = fill_slots(haystack, origin_index, needle, half_margin, params) {
            log::trace!("needle origin at haystack index {origin_index}");
            return Some(NeedleMatch {
                origin_index,
                origin: *origin,
                slots,
            });
        }
    }

    log::trace!(
        "no needle among {} markers ({} slots)",
        haystack.len(),
        needle.slot_count()
    );
    None
}

fn fill_slots(
    haystack: &[Marker],
    origin_index: usize,
    needle: &NeedleModel,
    half_margin: f32,
    params: &SearchParams,
) -> Option<Vec<SlotMatch>> {
    let origin = &haystack[origin_index];
    let mut slots: Vec<SlotMatch> = Vec::with_capacity(needle.slot_count());

    for &target in needle.distances() {
        let low = target - half_margin;
        let high = target + half_margin;
        let mut best: Option<SlotMatch> = None;

        for (index, candidate) in haystack.iter().enumerate() {
            if index == origin_index {
                continue;
            }
            if params.unique_markers && slots.iter().any(|s| s.index == index) {
                continue;
            }

            // Also rejects NaN distances from non-finite markers.
            let distance = candidate.distance_to(origin);
            if !(low..=high).contains(&distance) {
                continue;
            }

            let error = (distance - target).abs();
            if best.is_none_or(|b| error < b.error) {
                best = Some(SlotMatch {
                    index,
                    marker: *candidate,
                    distance,
                    error,
                });
            }
        }

        // An empty slot rules out this origin.
        slots.push(best?);
    }

    Some(slots)
}
