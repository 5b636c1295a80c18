//! Core of the party tools: weighted wheel slots, fair shuffling, winner
//! draws, pool policy and the buddy pairing board.

pub mod constants;
pub mod party_state;
pub mod shared_buddy_game;
pub mod shared_wheel_game;
pub mod shuffle;
pub mod validation;
pub mod wheel_layout;
