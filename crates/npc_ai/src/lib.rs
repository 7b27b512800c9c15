//! # npc_ai
//!
//! AI controller state machines driven by the Tick Scheduler: hostile
//! monsters (`AttackableAi`), owner-bound summons (`SummonAi`), and
//! non-combatant NPCs (`BasicNpcAi`). Every controller implements
//! [`AiController`], the contract the scheduler drives.

pub mod basic;
pub mod controller;
pub mod monster;
pub mod summon;
pub mod time;

pub use basic::BasicNpcAi;
pub use controller::AiController;
pub use monster::AttackableAi;
pub use summon::SummonAi;
pub use time::now_ms;
