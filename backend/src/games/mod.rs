pub mod backend_buddy_game;
pub mod backend_punishment_wheel;
pub mod backend_reward_wheel;
