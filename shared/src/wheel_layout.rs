//! Geometry and colours for drawing a wheel.
//!
//! Nothing here takes part in choosing a winner. The winner index is decided
//! first, and the animation is planned from its own seed to land on it.

use std::borrow::Cow;
use std::f64::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_DISPLAY_LABEL_CHARS;
use crate::shared_wheel_game::SlotSequence;

/// The fixed pointer sits at the top of the wheel.
pub const POINTER_ANGLE: f64 = PI * 1.5;
pub const MIN_EXTRA_TURNS: u32 = 4;
pub const MAX_EXTRA_TURNS: u32 = 6;
pub const MIN_SPIN_DURATION_MS: u32 = 1800;
pub const SPIN_DURATION_JITTER_MS: u32 = 600;

/// Hue in degrees, spread evenly over the segment count.
pub fn segment_hue(index: usize, count: usize) -> f64 {
    (index as f64 * 360.0 / count.max(1) as f64) % 360.0
}

pub fn segment_color(index: usize, count: usize) -> String {
    format!("hsl({}, 70%, 55%)", segment_hue(index, count))
}

/// Shortens long labels for drawing only.
pub fn display_label(label: &str) -> Cow<'_, str> {
    if label.chars().count() > MAX_DISPLAY_LABEL_CHARS {
        let mut short: String = label.chars().take(MAX_DISPLAY_LABEL_CHARS).collect();
        short.push('…');
        Cow::Owned(short)
    } else {
        Cow::Borrowed(label)
    }
}

pub fn segment_arc(count: usize) -> f64 {
    (PI * 2.0) / count.max(1) as f64
}

/// Wheel rotation that puts the centre of segment `index` under the pointer.
pub fn rest_angle(index: usize, count: usize) -> f64 {
    let arc = segment_arc(count);
    POINTER_ANGLE - (index as f64 * arc + arc / 2.0)
}

/// Which segment is under the pointer when the wheel is rotated by `angle`.
pub fn segment_under_pointer(angle: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let arc = segment_arc(count);
    let relative = (POINTER_ANGLE - angle).rem_euclid(PI * 2.0);
    Some(((relative / arc).floor() as usize).min(count - 1))
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    pub start_angle: f64,
    pub final_angle: f64,
    pub duration_ms: u32,
}

impl SpinAnimation {
    /// Plans a decelerating spin that stops with `index` under the pointer.
    /// The seed only shapes how many turns are made and for how long.
    pub fn plan(index: usize, count: usize, start_angle: f64, seed: u64) -> Option<Self> {
        if index >= count {
            return None;
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        let turns = rng.gen_range(MIN_EXTRA_TURNS..=MAX_EXTRA_TURNS);
        let duration_ms = MIN_SPIN_DURATION_MS + rng.gen_range(0..SPIN_DURATION_JITTER_MS);
        Some(Self {
            start_angle,
            final_angle: rest_angle(index, count) + PI * 2.0 * turns as f64,
            duration_ms,
        })
    }

    pub fn angle_at(&self, elapsed_ms: f64) -> f64 {
        let t = (elapsed_ms / self.duration_ms.max(1) as f64).clamp(0.0, 1.0);
        self.start_angle + (self.final_angle - self.start_angle) * ease_out_cubic(t)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Segment {
    pub label: String,
    pub display: String,
    pub color: String,
}

/// Everything a rendering surface needs to draw one wheel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WheelView {
    pub segments: Vec<Segment>,
    pub winner_index: Option<usize>,
    pub animation: Option<SpinAnimation>,
}

impl WheelView {
    pub fn new(labels: &SlotSequence, winner_index: Option<usize>, animation_seed: u64) -> Self {
        let count = labels.len();
        let segments = labels
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| Segment {
                label: label.clone(),
                display: display_label(label).into_owned(),
                color: segment_color(i, count),
            })
            .collect();
        let winner_index = winner_index.filter(|&i| i < count);
        let animation =
            winner_index.and_then(|i| SpinAnimation::plan(i, count, 0.0, animation_seed));

        Self {
            segments,
            winner_index,
            animation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hues_are_evenly_spaced() {
        assert_eq!(segment_hue(0, 4), 0.0);
        assert_eq!(segment_hue(1, 4), 90.0);
        assert_eq!(segment_hue(3, 4), 270.0);
        assert_eq!(segment_hue(0, 0), 0.0);
        assert_eq!(segment_color(2, 3), "hsl(240, 70%, 55%)");
    }

    #[test]
    fn test_display_label_truncates_by_chars() {
        assert_eq!(display_label("short"), "short");
        let thai = "ดื่ม 3 วินาที หรือ แทงปลาไหล 40";
        let shown = display_label(thai);
        assert_eq!(shown.chars().count(), MAX_DISPLAY_LABEL_CHARS + 1);
        assert!(shown.ends_with('…'));
        assert!(thai.starts_with(shown.trim_end_matches('…')));
    }

    #[test]
    fn test_rest_angle_lands_on_segment() {
        for count in 1..12 {
            for index in 0..count {
                assert_eq!(segment_under_pointer(rest_angle(index, count), count), Some(index));
            }
        }
        assert_eq!(segment_under_pointer(0.0, 0), None);
    }

    #[test]
    fn test_animation_stops_on_winner() {
        for seed in 0..20u64 {
            let plan = SpinAnimation::plan(3, 7, 0.0, seed).unwrap();
            let end = plan.angle_at(plan.duration_ms as f64 + 500.0);
            assert_eq!(end, plan.final_angle);
            assert_eq!(segment_under_pointer(end, 7), Some(3));
            assert!(plan.duration_ms >= MIN_SPIN_DURATION_MS);
            assert!(plan.duration_ms < MIN_SPIN_DURATION_MS + SPIN_DURATION_JITTER_MS);
            let turns = (plan.final_angle - rest_angle(3, 7)) / (PI * 2.0);
            assert!(turns.round() >= MIN_EXTRA_TURNS as f64 && turns.round() <= MAX_EXTRA_TURNS as f64);
        }
        assert!(SpinAnimation::plan(7, 7, 0.0, 1).is_none());
    }

    #[test]
    fn test_view_keeps_full_labels() {
        let labels = SlotSequence::new(vec!["a very long label indeed".to_string(), "b".to_string()]);
        let view = WheelView::new(&labels, Some(0), 42);
        assert_eq!(view.segments[0].label, "a very long label indeed");
        assert_eq!(view.segments[0].display, "a very long labe…");
        assert!(view.animation.is_some());

        let idle = WheelView::new(&labels, Some(5), 42);
        assert_eq!(idle.winner_index, None);
        assert!(idle.animation.is_none());
    }
}
