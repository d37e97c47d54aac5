//! Particle-world entities.
//!
//! Entities hold identity, shape and batched state only. Kinematics belong to
//! the external physics step; the scenario just reads and places positions.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::batch::{or_assign, BatchPos, DIM_P};

/// Circular collision shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Sphere { radius }
    }
}

/// Presentation color, carried for the render collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Gray,
}

impl Color {
    pub fn rgb(self) -> [f32; 3] {
        match self {
            Color::Red => [0.85, 0.35, 0.35],
            Color::Green => [0.35, 0.85, 0.35],
            Color::Blue => [0.35, 0.35, 0.85],
            Color::Gray => [0.25, 0.25, 0.25],
        }
    }
}

/// Batched physical state of an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub pos: BatchPos,
}

impl EntityState {
    pub fn new(batch_dim: usize) -> Self {
        EntityState {
            pos: BatchPos::zeros(batch_dim),
        }
    }

    /// Place the entity at `pos` in one row, or in every row when `batch_index` is `None`.
    pub fn set_pos(&mut self, pos: [f32; DIM_P], batch_index: Option<usize>) {
        match batch_index {
            Some(row) => self.pos.set_row(row, pos),
            None => self.pos.fill(pos),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub collide: bool,
    pub shape: Sphere,
    pub color: Color,
    pub state: EntityState,
}

impl Agent {
    pub fn new(name: impl Into<String>, collide: bool, shape: Sphere) -> Self {
        Agent {
            name: name.into(),
            collide,
            shape,
            color: Color::Blue,
            state: EntityState::new(0),
        }
    }

    pub(crate) fn allocate(&mut self, batch_dim: usize) {
        self.state = EntityState::new(batch_dim);
    }
}

/// A static entity. In the foraging scenario every landmark is a food item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub collide: bool,
    pub shape: Sphere,
    pub color: Color,
    pub state: EntityState,
    /// Consumed for good. Cleared only by a reset.
    pub eaten: Vec<bool>,
    /// Touched by at least one agent during the step being scored.
    pub just_eaten: Vec<bool>,
    /// Visibility per row, for presentation only.
    pub render: Vec<bool>,
}

impl Landmark {
    pub fn new(name: impl Into<String>, collide: bool, shape: Sphere, color: Color) -> Self {
        Landmark {
            name: name.into(),
            collide,
            shape,
            color,
            state: EntityState::new(0),
            eaten: Vec::new(),
            just_eaten: Vec::new(),
            render: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self, batch_dim: usize) {
        self.state = EntityState::new(batch_dim);
        self.eaten = vec![false; batch_dim];
        self.just_eaten = vec![false; batch_dim];
        self.render = vec![true; batch_dim];
    }

    #[inline]
    pub fn batch_dim(&self) -> usize {
        self.state.pos.batch_dim()
    }

    pub fn reset_render(&mut self) {
        self.render.par_iter_mut().for_each(|r| *r = true);
    }

    /// Fresh all-false consumption state across the whole batch.
    pub fn reset_consumption(&mut self) {
        let batch_dim = self.batch_dim();
        self.eaten = vec![false; batch_dim];
        self.just_eaten = vec![false; batch_dim];
        self.reset_render();
    }

    /// Un-eat and show the food in a single row. `just_eaten` is left alone.
    pub fn reset_consumption_at(&mut self, row: usize) {
        self.eaten[row] = false;
        self.render[row] = true;
    }

    /// Fold this step's touches into `eaten`, clear them, and hide eaten rows.
    ///
    /// Returns how many rows flipped to eaten.
    pub fn commit_step(&mut self) -> usize {
        let newly = self
            .just_eaten
            .par_iter()
            .zip(self.eaten.par_iter())
            .filter(|(j, e)| **j && !**e)
            .count();

        or_assign(&mut self.eaten, &self.just_eaten);
        self.just_eaten.par_iter_mut().for_each(|j| *j = false);
        self.render
            .par_iter_mut()
            .zip(self.eaten.par_iter())
            .for_each(|(r, e)| *r &= !*e);
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(batch_dim: usize) -> Landmark {
        let mut l = Landmark::new("food 0", false, Sphere::new(0.08), Color::Green);
        l.allocate(batch_dim);
        l
    }

    #[test]
    fn set_pos_targets_one_row_or_all() {
        let mut state = EntityState::new(3);
        state.set_pos([0.5, 0.5], None);
        state.set_pos([-0.2, 0.1], Some(2));
        assert_eq!(state.pos.row(0), [0.5, 0.5]);
        assert_eq!(state.pos.row(1), [0.5, 0.5]);
        assert_eq!(state.pos.row(2), [-0.2, 0.1]);
    }

    #[test]
    fn commit_is_sticky_and_clears_touches() {
        let mut l = food(3);
        l.just_eaten = vec![true, false, false];
        assert_eq!(l.commit_step(), 1);
        assert_eq!(l.eaten, vec![true, false, false]);
        assert_eq!(l.just_eaten, vec![false; 3]);
        assert_eq!(l.render, vec![false, true, true]);

        // Touching an eaten row again does not count and does not un-eat it.
        l.just_eaten = vec![true, true, false];
        assert_eq!(l.commit_step(), 1);
        assert_eq!(l.eaten, vec![true, true, false]);
        assert_eq!(l.render, vec![false, false, true]);
    }

    #[test]
    fn row_reset_leaves_touches_and_other_rows() {
        let mut l = food(2);
        l.eaten = vec![true, true];
        l.render = vec![false, false];
        l.just_eaten = vec![true, true];

        l.reset_consumption_at(1);
        assert_eq!(l.eaten, vec![true, false]);
        assert_eq!(l.render, vec![false, true]);
        assert_eq!(l.just_eaten, vec![true, true]);

        l.reset_consumption();
        assert_eq!(l.eaten, vec![false, false]);
        assert_eq!(l.just_eaten, vec![false, false]);
        assert_eq!(l.render, vec![true, true]);
    }

    #[test]
    fn green_is_green() {
        let [r, g, b] = Color::Green.rgb();
        assert!(g > r && g > b);
    }
}
