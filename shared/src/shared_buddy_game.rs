use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::constants::{DEFAULT_BUDDERS, DEFAULT_BUDDIES};
use crate::validation::parse_roster;

/// A confirmed one-to-one assignment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pair {
    pub buddy: String,
    pub budder: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    Buddy,
    Budder,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum PairAttempt {
    /// One side has not been chosen yet.
    Incomplete,
    BuddyAlreadyPaired,
    /// First press; the same pair must be requested again to commit.
    NeedsConfirmation,
    Paired(Pair),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BuddyBoard {
    pub buddies: Vec<String>,
    pub budders: Vec<String>,
    pub pairs: Vec<Pair>,
    pub selected_buddy: Option<String>,
    pub selected_budder: Option<String>,
    confirm_step: Option<(String, String)>,
}

impl Default for BuddyBoard {
    fn default() -> Self {
        Self::new(
            DEFAULT_BUDDIES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_BUDDERS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl BuddyBoard {
    pub fn new(buddies: Vec<String>, budders: Vec<String>) -> Self {
        Self {
            buddies,
            budders,
            pairs: Vec::new(),
            selected_buddy: None,
            selected_budder: None,
            confirm_step: None,
        }
    }

    /// Replaces the buddy list from newline separated text.
    pub fn set_buddies(&mut self, text: &str) {
        self.buddies = parse_roster(text);
        if let Some(buddy) = &self.selected_buddy {
            if !self.buddies.contains(buddy) {
                self.selected_buddy = None;
            }
        }
    }

    pub fn set_budders(&mut self, text: &str) {
        self.budders = parse_roster(text);
        if let Some(budder) = &self.selected_budder {
            if !self.budders.contains(budder) {
                self.selected_budder = None;
            }
        }
    }

    pub fn select(&mut self, side: PairSide, name: Option<String>) -> Result<(), ValidationError> {
        let (list, slot, code) = match side {
            PairSide::Buddy => (&self.buddies, &mut self.selected_buddy, "unknown_buddy"),
            PairSide::Budder => (&self.budders, &mut self.selected_budder, "unknown_budder"),
        };
        if let Some(name) = &name {
            if !list.contains(name) {
                return Err(ValidationError::new(code));
            }
        }
        *slot = name;
        Ok(())
    }

    pub fn used_buddies(&self) -> HashSet<&str> {
        self.pairs.iter().map(|p| p.buddy.as_str()).collect()
    }

    pub fn is_paired(&self, buddy: &str) -> bool {
        self.pairs.iter().any(|p| p.buddy == buddy)
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.confirm_step.is_some()
    }

    /// Pairs the selected buddy and budder once the same pair was asked for twice.
    /// A committed pair takes the budder out of the pool.
    pub fn request_pair(&mut self, timestamp: impl Into<String>) -> PairAttempt {
        let (Some(buddy), Some(budder)) = (self.selected_buddy.clone(), self.selected_budder.clone())
        else {
            return PairAttempt::Incomplete;
        };
        if self.is_paired(&buddy) {
            return PairAttempt::BuddyAlreadyPaired;
        }

        let candidate = (buddy, budder);
        if self.confirm_step.as_ref() != Some(&candidate) {
            self.confirm_step = Some(candidate);
            return PairAttempt::NeedsConfirmation;
        }
        self.confirm_step = None;

        let (buddy, budder) = candidate;
        let pair = Pair {
            buddy,
            budder,
            timestamp: timestamp.into(),
        };
        self.pairs.push(pair.clone());
        self.budders.retain(|b| *b != pair.budder);
        self.selected_budder = None;
        log::debug!("Paired {} with {}", pair.buddy, pair.budder);
        PairAttempt::Paired(pair)
    }

    /// Clears pairs but keeps both lists as they are.
    pub fn reset_pairs(&mut self) {
        self.pairs.clear();
        self.confirm_step = None;
    }

    pub fn view(&self) -> BuddyView {
        let mut used: Vec<String> = self.used_buddies().into_iter().map(str::to_string).collect();
        used.sort();
        BuddyView {
            buddies: self.buddies.clone(),
            budders: self.budders.clone(),
            pairs: self.pairs.clone(),
            selected_buddy: self.selected_buddy.clone(),
            selected_budder: self.selected_budder.clone(),
            used_buddies: used,
            awaiting_confirmation: self.awaiting_confirmation(),
        }
    }
}

// === API Types ===

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BuddyView {
    pub buddies: Vec<String>,
    pub budders: Vec<String>,
    pub pairs: Vec<Pair>,
    pub selected_buddy: Option<String>,
    pub selected_budder: Option<String>,
    pub used_buddies: Vec<String>,
    pub awaiting_confirmation: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuddyListsRequest {
    pub session_id: String,
    pub buddies: Option<String>,
    pub budders: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuddySelectRequest {
    pub session_id: String,
    pub side: PairSide,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PairRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PairResponse {
    pub success: bool,
    pub message: Option<String>,
    pub pair: Option<Pair>,
    pub view: BuddyView,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BuddyBoard {
        BuddyBoard::new(
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into(), "z".into()],
        )
    }

    #[test]
    fn test_pair_needs_both_sides() {
        let mut board = board();
        assert_eq!(board.request_pair("t"), PairAttempt::Incomplete);
        board.select(PairSide::Buddy, Some("a".into())).unwrap();
        assert_eq!(board.request_pair("t"), PairAttempt::Incomplete);
    }

    #[test]
    fn test_pair_requires_confirmation() {
        let mut board = board();
        board.select(PairSide::Buddy, Some("a".into())).unwrap();
        board.select(PairSide::Budder, Some("y".into())).unwrap();

        assert_eq!(board.request_pair("t1"), PairAttempt::NeedsConfirmation);
        assert!(board.awaiting_confirmation());
        assert!(board.pairs.is_empty());

        let attempt = board.request_pair("t2");
        assert_eq!(
            attempt,
            PairAttempt::Paired(Pair {
                buddy: "a".into(),
                budder: "y".into(),
                timestamp: "t2".into(),
            })
        );
        assert_eq!(board.budders, vec!["x", "z"]);
        assert_eq!(board.selected_budder, None);
        assert_eq!(board.selected_buddy.as_deref(), Some("a"));
        assert!(!board.awaiting_confirmation());
    }

    #[test]
    fn test_changed_selection_rearms_confirmation() {
        let mut board = board();
        board.select(PairSide::Buddy, Some("a".into())).unwrap();
        board.select(PairSide::Budder, Some("x".into())).unwrap();
        assert_eq!(board.request_pair("t"), PairAttempt::NeedsConfirmation);
        board.select(PairSide::Budder, Some("z".into())).unwrap();
        assert_eq!(board.request_pair("t"), PairAttempt::NeedsConfirmation);
        assert!(matches!(board.request_pair("t"), PairAttempt::Paired(_)));
    }

    #[test]
    fn test_buddy_cannot_pair_twice() {
        let mut board = board();
        board.select(PairSide::Buddy, Some("a".into())).unwrap();
        board.select(PairSide::Budder, Some("x".into())).unwrap();
        board.request_pair("t");
        board.request_pair("t");
        board.select(PairSide::Budder, Some("y".into())).unwrap();
        assert_eq!(board.request_pair("t"), PairAttempt::BuddyAlreadyPaired);
        assert!(board.used_buddies().contains("a"));
    }

    #[test]
    fn test_select_unknown_name_fails() {
        let mut board = board();
        let err = board.select(PairSide::Budder, Some("nobody".into())).unwrap_err();
        assert_eq!(err.code, "unknown_budder");
        board.select(PairSide::Buddy, None).unwrap();
    }

    #[test]
    fn test_reset_keeps_lists() {
        let mut board = board();
        board.select(PairSide::Buddy, Some("b".into())).unwrap();
        board.select(PairSide::Budder, Some("z".into())).unwrap();
        board.request_pair("t");
        board.request_pair("t");
        board.reset_pairs();
        assert!(board.pairs.is_empty());
        assert_eq!(board.budders, vec!["x", "y"]);
        assert_eq!(board.buddies, vec!["a", "b"]);
    }

    #[test]
    fn test_set_budders_drops_stale_selection() {
        let mut board = board();
        board.select(PairSide::Budder, Some("z".into())).unwrap();
        board.set_budders("x\n y \n");
        assert_eq!(board.budders, vec!["x", "y"]);
        assert_eq!(board.selected_budder, None);
    }
}
