use std::borrow::Cow;
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::constants::{ANNOTATION_MARKER, DEFAULT_EXEMPT_PLAYER, DEFAULT_PUNISHMENTS};
use crate::shuffle::{shuffle_avoid_adjacent, WEIGHTED_SHUFFLE_ATTEMPTS};
use crate::validation::{
    clamp_form_number, validate_pool_size, validate_unique_label, MAX_SECONDS, MAX_WEIGHT,
};
use crate::wheel_layout::WheelView;

static ANNOTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}\s*([0-9]+)", regex::escape(ANNOTATION_MARKER)))
        .expect("annotation pattern is a valid regex")
});

/// A labelled outcome whose weight is the number of wheel slots it gets.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WeightedItem {
    pub label: String,
    pub weight: u32,
    pub seconds: u32,
}

impl WeightedItem {
    pub fn new(label: impl Into<String>, seconds: u32, weight: u32) -> Self {
        Self {
            label: label.into(),
            weight,
            seconds,
        }
    }

    /// Builds an item from unchecked form numbers, clamping both into `0..=999`.
    pub fn from_raw(label: impl Into<String>, seconds: i64, weight: i64) -> Self {
        Self::new(
            label,
            clamp_form_number(seconds, MAX_SECONDS),
            clamp_form_number(weight, MAX_WEIGHT),
        )
    }
}

/// Ordered display slots of a wheel, one per unit of weight.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct SlotSequence(Vec<String>);

impl SlotSequence {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Number of slots per label.
    pub fn counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.0 {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// True when the slots hold exactly one label per pool entry.
    pub fn matches_pool<T: PoolEntry>(&self, pool: &[T]) -> bool {
        if self.0.len() != pool.len() {
            return false;
        }
        let mut expected: BTreeMap<String, usize> = BTreeMap::new();
        for entry in pool {
            *expected.entry(entry.slot_label().into_owned()).or_insert(0) += 1;
        }
        self.counts()
            .into_iter()
            .all(|(label, n)| expected.get(label) == Some(&n))
    }
}

/// Repeats every positive-weight label `weight` times, in item order.
pub fn flatten_weighted_labels(items: &[WeightedItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.weight > 0)
        .flat_map(|item| std::iter::repeat(item.label.clone()).take(item.weight as usize))
        .collect()
}

/// Expands weighted items into wheel slots, shuffled so equal labels are not
/// neighbours where that is possible.
pub fn expand_weighted_labels<R: Rng + ?Sized>(items: &[WeightedItem], rng: &mut R) -> SlotSequence {
    let expanded = flatten_weighted_labels(items);
    SlotSequence::new(shuffle_avoid_adjacent(&expanded, WEIGHTED_SHUFFLE_ATTEMPTS, rng))
}

/// Draws a slot index uniformly, so each label wins in proportion to its slot count.
pub fn select_winner<T, R: Rng + ?Sized>(slots: &[T], rng: &mut R) -> Option<usize> {
    if slots.is_empty() {
        return None;
    }
    Some(rng.gen_range(0..slots.len()))
}

/// Pulls the alternative point value out of a label such as
/// `"ดื่ม 3 วินาที หรือ แทงปลาไหล 40"`. Display only.
pub fn parse_annotation(label: &str) -> Option<u32> {
    ANNOTATION_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// A value that can sit in a wheel pool.
pub trait PoolEntry {
    /// The label its slots carry on the wheel.
    fn slot_label(&self) -> Cow<'_, str>;
}

impl PoolEntry for u32 {
    fn slot_label(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl PoolEntry for WeightedItem {
    fn slot_label(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemovalPolicy {
    pub remove_enabled: bool,
    pub is_exempt: bool,
}

impl RemovalPolicy {
    pub fn applies(&self) -> bool {
        self.remove_enabled && !self.is_exempt
    }
}

/// Applies the without-replacement rule after a win.
///
/// Every pool entry whose label equals `winner_label` is dropped and the
/// cached slots are discarded. Returns how many entries were removed.
pub fn after_win<T: PoolEntry>(
    winner_label: &str,
    pool: &mut Vec<T>,
    cache: &mut Option<SlotSequence>,
    policy: RemovalPolicy,
) -> usize {
    if !policy.applies() {
        return 0;
    }
    let before = pool.len();
    pool.retain(|entry| entry.slot_label() != winner_label);
    *cache = None;
    before - pool.len()
}

/// The player whose spins never cost anything and never shrink the pool.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExemptRule {
    pub name: String,
}

impl ExemptRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is_exempt(&self, player: &str) -> bool {
        let name = self.name.trim();
        !name.is_empty() && player.trim().to_uppercase() == name.to_uppercase()
    }
}

impl Default for ExemptRule {
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPT_PLAYER)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SpinResult {
    pub winner_index: usize,
    pub resolved_label: String,
}

/// One completed spin: the slots that were drawn from, and what came out.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WheelSpin<T> {
    pub result: SpinResult,
    pub labels: SlotSequence,
    pub removed: usize,
    pub outcome: T,
    /// Drives the deceleration only. Zero when resolved without a spin.
    pub animation_seed: u64,
}

fn replay_seed(winner_index: Option<usize>, spin_seed: Option<u64>, fallback: u64) -> u64 {
    match (winner_index, spin_seed) {
        (Some(_), Some(seed)) => seed,
        _ => fallback,
    }
}

// === Reward wheel (equal odds) ===

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RewardWheel {
    pub pool: Vec<u32>,
    pub labels: Option<SlotSequence>,
    pub winner_index: Option<usize>,
    pub remove_after: bool,
    pub last: Option<u32>,
    #[serde(default)]
    pub spin_seed: Option<u64>,
}

impl RewardWheel {
    pub fn new(size: u32) -> Self {
        Self {
            pool: (1..=size).collect(),
            labels: None,
            winner_index: None,
            remove_after: false,
            last: None,
            spin_seed: None,
        }
    }

    /// Refills the pool with `1..=size` and forgets the previous spin.
    pub fn reset(&mut self, size: u32) -> Result<(), ValidationError> {
        validate_pool_size(size)?;
        self.pool = (1..=size).collect();
        self.labels = None;
        self.winner_index = None;
        self.last = None;
        Ok(())
    }

    pub fn set_remove_after(&mut self, enabled: bool) {
        self.remove_after = enabled;
    }

    /// Current display slots, rebuilt when missing or out of step with the pool.
    pub fn labels<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &SlotSequence {
        let stale = match &self.labels {
            Some(labels) => !labels.matches_pool(&self.pool),
            None => true,
        };
        if stale {
            // Pool values are distinct, a plain shuffle cannot cluster them.
            let mut labels: Vec<String> = self.pool.iter().map(|v| v.to_string()).collect();
            labels.shuffle(rng);
            self.winner_index = None;
            self.labels = Some(SlotSequence::new(labels));
        }
        self.labels.get_or_insert_with(SlotSequence::default)
    }

    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<WheelSpin<u32>> {
        let index = {
            let labels = self.labels(rng);
            select_winner(labels.labels(), rng)
        };
        match index {
            Some(index) => {
                let mut spin = self.resolve(index)?;
                spin.animation_seed = rng.gen();
                self.spin_seed = Some(spin.animation_seed);
                Some(spin)
            }
            None => {
                self.winner_index = None;
                None
            }
        }
    }

    /// Records the value at `index` of the current slots as the result.
    pub fn resolve(&mut self, index: usize) -> Option<WheelSpin<u32>> {
        let labels = self.labels.clone()?;
        let label = labels.get(index)?.to_string();
        let value: u32 = label.parse().ok()?;

        self.winner_index = Some(index);
        self.spin_seed = None;
        self.last = Some(value);
        let policy = RemovalPolicy {
            remove_enabled: self.remove_after,
            is_exempt: false,
        };
        let removed = after_win(&label, &mut self.pool, &mut self.labels, policy);
        if self.labels.is_none() {
            self.winner_index = None;
        }
        log::debug!("Reward wheel landed on {} ({} left in pool)", value, self.pool.len());

        Some(WheelSpin {
            result: SpinResult {
                winner_index: index,
                resolved_label: label,
            },
            labels,
            removed,
            outcome: value,
            animation_seed: 0,
        })
    }

    /// A pending winner replays the seed stored with its spin; `animation_seed`
    /// is used otherwise.
    pub fn view<R: Rng + ?Sized>(&mut self, rng: &mut R, animation_seed: u64) -> RewardWheelView {
        let labels = self.labels(rng).clone();
        let seed = replay_seed(self.winner_index, self.spin_seed, animation_seed);
        let wheel = WheelView::new(&labels, self.winner_index, seed);
        RewardWheelView {
            pool: self.pool.clone(),
            remove_after: self.remove_after,
            last: self.last,
            wheel,
        }
    }
}

// === Punishment wheel (weighted) ===

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PunishmentOutcome {
    pub player: String,
    pub label: String,
    pub seconds: u32,
    pub annotation: Option<u32>,
    pub message: String,
}

impl PunishmentOutcome {
    pub fn new(player: &str, label: &str, seconds: u32) -> Self {
        let annotation = parse_annotation(label);
        let mut message = format!("Result: {} → drink {} seconds", player, seconds);
        if let Some(points) = annotation {
            message.push_str(&format!(" or {} {}", ANNOTATION_MARKER, points));
        }
        Self {
            player: player.to_string(),
            label: label.to_string(),
            seconds,
            annotation,
            message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PunishmentWheel {
    pub items: Vec<WeightedItem>,
    pub labels: Option<SlotSequence>,
    pub winner_index: Option<usize>,
    pub remove_after: bool,
    pub last: Option<PunishmentOutcome>,
    #[serde(default)]
    pub spin_seed: Option<u64>,
}

impl Default for PunishmentWheel {
    fn default() -> Self {
        Self::new(
            DEFAULT_PUNISHMENTS
                .iter()
                .map(|&(label, seconds, weight)| WeightedItem::new(label, seconds, weight))
                .collect(),
        )
    }
}

impl PunishmentWheel {
    pub fn new(items: Vec<WeightedItem>) -> Self {
        Self {
            items,
            labels: None,
            winner_index: None,
            remove_after: false,
            last: None,
            spin_seed: None,
        }
    }

    fn invalidate(&mut self) {
        self.labels = None;
        self.winner_index = None;
    }

    pub fn add_item(&mut self, item: WeightedItem) -> Result<(), ValidationError> {
        validate_unique_label(&item.label, self.items.iter().map(|it| it.label.as_str()))?;
        self.items.push(item);
        self.invalidate();
        Ok(())
    }

    pub fn update_item(&mut self, index: usize, item: WeightedItem) -> Result<(), ValidationError> {
        if index >= self.items.len() {
            return Err(ValidationError::new("unknown_item"));
        }
        let others = self
            .items
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, it)| it.label.as_str());
        validate_unique_label(&item.label, others)?;
        self.items[index] = item;
        self.invalidate();
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<WeightedItem, ValidationError> {
        if index >= self.items.len() {
            return Err(ValidationError::new("unknown_item"));
        }
        let removed = self.items.remove(index);
        self.invalidate();
        Ok(removed)
    }

    pub fn set_remove_after(&mut self, enabled: bool) {
        self.remove_after = enabled;
    }

    /// Items that currently own at least one slot.
    pub fn effective_items(&self) -> impl Iterator<Item = &WeightedItem> {
        self.items.iter().filter(|item| item.weight > 0)
    }

    pub fn labels<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &SlotSequence {
        if self.labels.is_none() {
            self.winner_index = None;
        }
        let items = &self.items;
        self.labels.get_or_insert_with(|| expand_weighted_labels(items, rng))
    }

    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        player: &str,
        exempt: &ExemptRule,
        rng: &mut R,
    ) -> Option<WheelSpin<PunishmentOutcome>> {
        let index = {
            let labels = self.labels(rng);
            select_winner(labels.labels(), rng)
        };
        match index {
            Some(index) => {
                let mut spin = self.resolve(player, exempt, index)?;
                spin.animation_seed = rng.gen();
                self.spin_seed = Some(spin.animation_seed);
                Some(spin)
            }
            None => {
                self.winner_index = None;
                None
            }
        }
    }

    /// Records the punishment at `index` for `player`.
    ///
    /// The exempt player's recorded seconds are always 0, while the drawn slot
    /// is left as is so the wheel still stops where it was drawn.
    pub fn resolve(
        &mut self,
        player: &str,
        exempt: &ExemptRule,
        index: usize,
    ) -> Option<WheelSpin<PunishmentOutcome>> {
        let labels = self.labels.clone()?;
        let label = labels.get(index)?.to_string();
        let chosen = self
            .effective_items()
            .find(|item| item.label == label)
            .cloned()
            .unwrap_or_else(|| WeightedItem::new(label.clone(), 0, 1));

        let is_exempt = exempt.is_exempt(player);
        let seconds = if is_exempt { 0 } else { chosen.seconds };
        let outcome = PunishmentOutcome::new(player, &chosen.label, seconds);

        self.winner_index = Some(index);
        self.spin_seed = None;
        self.last = Some(outcome.clone());
        let policy = RemovalPolicy {
            remove_enabled: self.remove_after,
            is_exempt,
        };
        let removed = after_win(&chosen.label, &mut self.items, &mut self.labels, policy);
        if self.labels.is_none() {
            self.winner_index = None;
        }
        log::debug!("Punishment wheel: {}", outcome.message);

        Some(WheelSpin {
            result: SpinResult {
                winner_index: index,
                resolved_label: label,
            },
            labels,
            removed,
            outcome,
            animation_seed: 0,
        })
    }

    pub fn view<R: Rng + ?Sized>(&mut self, rng: &mut R, animation_seed: u64) -> PunishmentWheelView {
        let labels = self.labels(rng).clone();
        let seed = replay_seed(self.winner_index, self.spin_seed, animation_seed);
        let wheel = WheelView::new(&labels, self.winner_index, seed);
        PunishmentWheelView {
            items: self.items.clone(),
            remove_after: self.remove_after,
            last: self.last.clone(),
            wheel,
        }
    }
}

// === API Types ===

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RewardWheelView {
    pub pool: Vec<u32>,
    pub remove_after: bool,
    pub last: Option<u32>,
    pub wheel: WheelView,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PunishmentWheelView {
    pub items: Vec<WeightedItem>,
    pub remove_after: bool,
    pub last: Option<PunishmentOutcome>,
    pub wheel: WheelView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RewardResetRequest {
    pub session_id: String,
    pub size: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveAfterRequest {
    pub session_id: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelSpinRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelSpinResponse<V, T> {
    pub success: bool,
    pub message: Option<String>,
    pub view: V,
    pub result: Option<WheelSpin<T>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub session_id: String,
    pub label: String,
    pub seconds: i64,
    pub weight: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub session_id: String,
    pub index: usize,
    pub label: String,
    pub seconds: i64,
    pub weight: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteItemRequest {
    pub session_id: String,
    pub index: usize,
}
