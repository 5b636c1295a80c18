use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::constants::{EMPTY_PUNISHMENT_WHEEL_ERROR, EMPTY_REWARD_POOL_ERROR, NO_PLAYER_SELECTED_ERROR};
use crate::shared_buddy_game::{BuddyBoard, BuddyView};
use crate::shared_wheel_game::{
    ExemptRule, PunishmentOutcome, PunishmentWheel, PunishmentWheelView, RewardWheel, RewardWheelView,
    WheelSpin,
};

/// Why a spin did not happen. None of these are faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRefusal {
    NoPlayerSelected,
    EmptyPunishmentWheel,
    EmptyRewardPool,
}

impl SpinRefusal {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoPlayerSelected => NO_PLAYER_SELECTED_ERROR,
            Self::EmptyPunishmentWheel => EMPTY_PUNISHMENT_WHEEL_ERROR,
            Self::EmptyRewardPool => EMPTY_REWARD_POOL_ERROR,
        }
    }
}

/// All state of one interactive session. Each handler takes it by `&mut`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PartyState {
    pub reward: RewardWheel,
    pub punishment: PunishmentWheel,
    /// The buddy list doubles as the punishment wheel's player roster.
    pub buddy: BuddyBoard,
    pub selected_player: Option<String>,
    pub exempt: ExemptRule,
}

impl PartyState {
    pub fn new(reward_pool_size: u32, exempt: ExemptRule) -> Self {
        Self {
            reward: RewardWheel::new(reward_pool_size),
            punishment: PunishmentWheel::default(),
            buddy: BuddyBoard::default(),
            selected_player: None,
            exempt,
        }
    }

    pub fn players(&self) -> &[String] {
        &self.buddy.buddies
    }

    pub fn select_player(&mut self, player: Option<String>) -> Result<(), ValidationError> {
        if let Some(name) = &player {
            if !self.players().contains(name) {
                return Err(ValidationError::new("unknown_player"));
            }
        }
        self.selected_player = player;
        Ok(())
    }

    /// Replaces the player roster; a selected player who left is deselected.
    pub fn update_roster(&mut self, text: &str) {
        self.buddy.set_buddies(text);
        if let Some(player) = &self.selected_player {
            if !self.buddy.buddies.contains(player) {
                self.selected_player = None;
            }
        }
    }

    pub fn spin_reward<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<WheelSpin<u32>, SpinRefusal> {
        self.reward.spin(rng).ok_or(SpinRefusal::EmptyRewardPool)
    }

    /// The punishment wheel only turns once a player has been picked.
    pub fn spin_punishment<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<WheelSpin<PunishmentOutcome>, SpinRefusal> {
        let player = self
            .selected_player
            .clone()
            .ok_or(SpinRefusal::NoPlayerSelected)?;
        self.punishment
            .spin(&player, &self.exempt, rng)
            .ok_or(SpinRefusal::EmptyPunishmentWheel)
    }

    pub fn view<R: Rng + ?Sized>(&mut self, rng: &mut R, animation_seed: u64) -> PartyView {
        PartyView {
            reward: self.reward.view(rng, animation_seed),
            punishment: self.punishment_view(rng, animation_seed),
            buddy: self.buddy.view(),
        }
    }

    pub fn punishment_view<R: Rng + ?Sized>(&mut self, rng: &mut R, animation_seed: u64) -> PunishmentPanelView {
        PunishmentPanelView {
            players: self.players().to_vec(),
            selected_player: self.selected_player.clone(),
            wheel: self.punishment.view(rng, animation_seed),
        }
    }
}

// === API Types ===

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PunishmentPanelView {
    pub players: Vec<String>,
    pub selected_player: Option<String>,
    pub wheel: PunishmentWheelView,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PartyView {
    pub reward: RewardWheelView,
    pub punishment: PunishmentPanelView,
    pub buddy: BuddyView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub view: PartyView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectPlayerRequest {
    pub session_id: String,
    pub player: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RosterRequest {
    pub session_id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_punishment_spin_needs_player() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut party = PartyState::new(10, ExemptRule::default());
        assert_eq!(
            party.spin_punishment(&mut rng).unwrap_err(),
            SpinRefusal::NoPlayerSelected
        );
        party.select_player(Some("เขต".into())).unwrap();
        let spin = party.spin_punishment(&mut rng).unwrap();
        assert_eq!(spin.outcome.player, "เขต");
    }

    #[test]
    fn test_select_unknown_player_fails() {
        let mut party = PartyState::new(10, ExemptRule::default());
        assert!(party.select_player(Some("stranger".into())).is_err());
        assert_eq!(party.selected_player, None);
    }

    #[test]
    fn test_roster_update_clears_missing_player() {
        let mut party = PartyState::new(10, ExemptRule::default());
        party.select_player(Some("MARK".into())).unwrap();
        party.update_roster("MARK\nตอง");
        assert_eq!(party.selected_player.as_deref(), Some("MARK"));
        party.update_roster("ตอง");
        assert_eq!(party.selected_player, None);
        assert_eq!(party.players().to_vec(), vec!["ตอง"]);
    }

    #[test]
    fn test_empty_reward_pool_refuses() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut party = PartyState::new(1, ExemptRule::default());
        party.reward.set_remove_after(true);
        assert_eq!(party.spin_reward(&mut rng).unwrap().outcome, 1);
        assert_eq!(party.spin_reward(&mut rng).unwrap_err(), SpinRefusal::EmptyRewardPool);
    }

    #[test]
    fn test_view_reflects_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut party = PartyState::new(4, ExemptRule::default());
        let view = party.view(&mut rng, 0);
        assert_eq!(view.reward.wheel.segments.len(), 4);
        assert_eq!(view.punishment.wheel.wheel.segments.len(), 10);
        assert_eq!(view.punishment.players.len(), party.players().len());
        assert_eq!(view.buddy.pairs.len(), 0);
    }
}
