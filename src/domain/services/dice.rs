//! Dice - every random decision in a run is drawn through this trait
//!
//! The only primitive is a uniform draw in `[0, 1)`; die rolls, pools and
//! advantage are all built on top of it so that a seeded source fully
//! determines the outcome of a run.

/// Source of uniform draws plus the dice helpers built from them
pub trait Dice {
    /// Uniform value in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;

    /// One die: an integer in `[1, sides]`. Returns 0 for a zero-sided die.
    fn d(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        let face = (self.next_f64() * f64::from(sides)).floor() as u32 + 1;
        face.min(sides)
    }

    /// Sum of `count` independent `d(sides)` draws, saturating at `u32::MAX`
    fn roll_dice(&mut self, count: u32, sides: u32) -> u32 {
        let mut total: u32 = 0;
        for _ in 0..count {
            total = total.saturating_add(self.d(sides));
        }
        total
    }

    /// Two draws, keep the higher
    fn roll_with_advantage(&mut self, sides: u32) -> u32 {
        let first = self.d(sides);
        let second = self.d(sides);
        first.max(second)
    }

    /// Two draws, keep the lower
    fn roll_with_disadvantage(&mut self, sides: u32) -> u32 {
        let first = self.d(sides);
        let second = self.d(sides);
        first.min(second)
    }

    /// Uniform index into a collection of `len` elements (`len > 0`)
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64).floor() as usize).min(len - 1)
    }
}

/// How a d20 is rolled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl RollMode {
    /// Advantage and disadvantage cancel out
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, false) => Self::Advantage,
            (false, true) => Self::Disadvantage,
            _ => Self::Normal,
        }
    }

    pub fn roll<D: Dice + ?Sized>(self, dice: &mut D, sides: u32) -> u32 {
        match self {
            Self::Normal => dice.d(sides),
            Self::Advantage => dice.roll_with_advantage(sides),
            Self::Disadvantage => dice.roll_with_disadvantage(sides),
        }
    }
}
