//! Column selection for the wave-height chart.
//!
//! The chart asks for one column per tick when it creates or drains drops.
//! Production wiring shares one `SmallRng` between every chart; tests plug in
//! [`RoundRobin`] so runs are reproducible.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{cell::RefCell, rc::Rc};

/// Source of column indices in `[0, columns)`.
pub trait ColumnPicker {
    fn pick(&mut self, columns: usize) -> usize;
}

/// Uniform random picker. Clones share the same generator.
#[derive(Clone, Debug)]
pub struct UniformPicker {
    rng: Rc<RefCell<SmallRng>>,
}

impl UniformPicker {
    pub fn from_entropy() -> Self {
        Self::from_rng(SmallRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            rng: Rc::new(RefCell::new(rng)),
        }
    }
}

impl ColumnPicker for UniformPicker {
    fn pick(&mut self, columns: usize) -> usize {
        if columns == 0 {
            return 0;
        }
        self.rng.borrow_mut().gen_range(0..columns)
    }
}

/// Deterministic picker cycling through the columns in order.
#[derive(Clone, Debug, Default)]
pub struct RoundRobin {
    next: usize,
}

impl ColumnPicker for RoundRobin {
    fn pick(&mut self, columns: usize) -> usize {
        if columns == 0 {
            return 0;
        }
        let column = self.next % columns;
        self.next = column + 1;
        column
    }
}
