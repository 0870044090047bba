//! Fight-scene "special move" cue
//!
//! Purely cosmetic, but driven by core score state: each role launches an
//! attack animation whenever its score has grown by `every` points since its
//! last attack, and the boss flinches while any attack is playing. Collision
//! resolution never looks at this.

use serde::{Deserialize, Serialize};

pub const ATTACK_FRAMES: u8 = 2;
pub const ATTACK_TICKS_PER_FRAME: u32 = 8;
pub const BOSS_HIT_FRAMES: u8 = 3;
pub const BOSS_TICKS_PER_FRAME: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct FighterCue {
    attacking: bool,
    frame: u8,
    counter: u32,
    last_trigger_score: u32,
}

impl FighterCue {
    fn try_trigger(&mut self, score: u32, every: u32) -> bool {
        if score >= self.last_trigger_score + every && !self.attacking {
            self.attacking = true;
            self.last_trigger_score = score;
            return true;
        }
        false
    }

    fn animate(&mut self) {
        if !self.attacking {
            return;
        }
        self.counter += 1;
        if self.counter >= ATTACK_TICKS_PER_FRAME {
            self.counter = 0;
            self.frame += 1;
            if self.frame >= ATTACK_FRAMES {
                self.attacking = false;
                self.frame = 0;
            }
        }
    }
}

/// Attack animation state for both roles and the boss
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialMoveCue {
    fighters: [FighterCue; 2],
    boss_frame: u8,
    boss_counter: u32,
}

impl SpecialMoveCue {
    /// Advance one tick from the current scores (indexed by role)
    ///
    /// Returns which roles started an attack this tick.
    pub fn update(&mut self, scores: [u32; 2], every: u32) -> [bool; 2] {
        let mut started = [false; 2];
        for (i, fighter) in self.fighters.iter_mut().enumerate() {
            started[i] = fighter.try_trigger(scores[i], every);
        }
        for fighter in &mut self.fighters {
            fighter.animate();
        }

        if self.fighters.iter().any(|f| f.attacking) {
            self.boss_counter += 1;
            if self.boss_counter >= BOSS_TICKS_PER_FRAME {
                self.boss_counter = 0;
                self.boss_frame = (self.boss_frame + 1) % BOSS_HIT_FRAMES;
            }
        } else {
            self.boss_frame = 0;
            self.boss_counter = 0;
        }
        started
    }

    /// Current attack frame per role, `None` while idle
    pub fn fighter_frames(&self) -> [Option<u8>; 2] {
        [0, 1].map(|i| {
            let f = &self.fighters[i];
            f.attacking.then_some(f.frame)
        })
    }

    pub fn boss_frame(&self) -> u8 {
        self.boss_frame
    }
}
