//! Batched value containers.
//!
//! Every per-entity attribute keeps one slot per environment instance and is
//! stored column-wise (SoA), so a whole batch is advanced with bulk slice
//! operations. Per-row conditionals are expressed as boolean masks applied to
//! whole columns rather than as control flow per environment.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Spatial dimensionality of the particle world.
pub const DIM_P: usize = 2;

/// Batched 2-D positions, one row per environment instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchPos {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

impl BatchPos {
    pub fn zeros(batch_dim: usize) -> Self {
        BatchPos {
            x: vec![0.0; batch_dim],
            y: vec![0.0; batch_dim],
        }
    }

    /// Build from row-major `[x, y]` pairs.
    pub fn from_rows(rows: &[[f32; DIM_P]]) -> Self {
        BatchPos {
            x: rows.iter().map(|p| p[0]).collect(),
            y: rows.iter().map(|p| p[1]).collect(),
        }
    }

    #[inline]
    pub fn batch_dim(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn row(&self, row: usize) -> [f32; DIM_P] {
        [self.x[row], self.y[row]]
    }

    #[inline]
    pub fn set_row(&mut self, row: usize, pos: [f32; DIM_P]) {
        self.x[row] = pos[0];
        self.y[row] = pos[1];
    }

    /// Broadcast one position to every row.
    pub fn fill(&mut self, pos: [f32; DIM_P]) {
        self.x.par_iter_mut().for_each(|x| *x = pos[0]);
        self.y.par_iter_mut().for_each(|y| *y = pos[1]);
    }

    /// Per-row Euclidean distance to `other`.
    pub fn distance(&self, other: &BatchPos) -> Vec<f32> {
        self.x
            .par_iter()
            .zip(self.y.par_iter())
            .zip(other.x.par_iter())
            .zip(other.y.par_iter())
            .map(|(((ax, ay), bx), by)| {
                let dx = ax - bx;
                let dy = ay - by;
                (dx * dx + dy * dy).sqrt()
            })
            .collect()
    }

    /// Rows where the distance to `other` is strictly below `threshold`.
    pub fn within(&self, other: &BatchPos, threshold: f32) -> Vec<bool> {
        self.distance(other)
            .into_par_iter()
            .map(|d| d < threshold)
            .collect()
    }
}

/// Row-major `rows x cols` matrix of per-environment feature vectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchMatrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

impl BatchMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        BatchMatrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[f32]>::to_vec).collect()
    }
}

/// `a AND NOT b`, row by row.
pub fn mask_and_not(a: &[bool], b: &[bool]) -> Vec<bool> {
    a.par_iter().zip(b.par_iter()).map(|(a, b)| *a && !*b).collect()
}

/// `a AND b`, row by row.
pub fn mask_and(a: &[bool], b: &[bool]) -> Vec<bool> {
    a.par_iter().zip(b.par_iter()).map(|(a, b)| *a && *b).collect()
}

/// `target |= mask`, row by row.
pub fn or_assign(target: &mut [bool], mask: &[bool]) {
    target
        .par_iter_mut()
        .zip(mask.par_iter())
        .for_each(|(t, m)| *t |= *m);
}

/// `target &= mask`, row by row.
pub fn and_assign(target: &mut [bool], mask: &[bool]) {
    target
        .par_iter_mut()
        .zip(mask.par_iter())
        .for_each(|(t, m)| *t &= *m);
}

/// `target[mask] += values[mask]`.
pub fn masked_add(target: &mut [f32], mask: &[bool], values: &[f32]) {
    target
        .par_iter_mut()
        .zip(mask.par_iter())
        .zip(values.par_iter())
        .for_each(|((t, m), v)| *t += if *m { *v } else { 0.0 });
}

/// `target[mask] += value`.
pub fn masked_add_scalar(target: &mut [f32], mask: &[bool], value: f32) {
    target
        .par_iter_mut()
        .zip(mask.par_iter())
        .for_each(|(t, m)| *t += if *m { value } else { 0.0 });
}

/// Elementwise `1 / n`, with the reciprocal of zero mapped to zero.
pub fn reciprocal_or_zero(counts: &[u32]) -> Vec<f32> {
    counts
        .par_iter()
        .map(|&n| if n == 0 { 0.0 } else { 1.0 / n as f32 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean_per_row() {
        let a = BatchPos::from_rows(&[[0.0, 0.0], [1.0, 1.0]]);
        let b = BatchPos::from_rows(&[[3.0, 4.0], [1.0, 1.0]]);
        let d = a.distance(&b);
        assert!((d[0] - 5.0).abs() < 1e-6);
        assert_eq!(d[1], 0.0);
    }

    #[test]
    fn within_excludes_the_exact_boundary() {
        let a = BatchPos::from_rows(&[[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]);
        let b = BatchPos::from_rows(&[[0.5, 0.0], [0.25, 0.0], [0.0, 0.75]]);
        assert_eq!(a.within(&b, 0.5), vec![false, true, false]);
    }

    #[test]
    fn fill_and_set_row() {
        let mut p = BatchPos::zeros(3);
        p.fill([0.5, -0.5]);
        p.set_row(1, [0.1, 0.2]);
        assert_eq!(p.row(0), [0.5, -0.5]);
        assert_eq!(p.row(1), [0.1, 0.2]);
        assert_eq!(p.row(2), [0.5, -0.5]);
        assert_eq!(p.batch_dim(), 3);
    }

    #[test]
    fn masks_combine_rowwise() {
        let a = [true, true, false, false];
        let b = [true, false, true, false];
        assert_eq!(mask_and_not(&a, &b), vec![false, true, false, false]);
        assert_eq!(mask_and(&a, &b), vec![true, false, false, false]);

        let mut t = a;
        or_assign(&mut t, &b);
        assert_eq!(t, [true, true, true, false]);

        let mut t = a;
        and_assign(&mut t, &b);
        assert_eq!(t, [true, false, false, false]);
    }

    #[test]
    fn masked_adds_only_touch_selected_rows() {
        let mut rews = vec![0.0, 1.0, 2.0];
        masked_add(&mut rews, &[true, false, true], &[0.5, 9.0, 0.25]);
        assert_eq!(rews, vec![0.5, 1.0, 2.25]);

        masked_add_scalar(&mut rews, &[false, true, false], 1.0);
        assert_eq!(rews, vec![0.5, 2.0, 2.25]);
    }

    #[test]
    fn reciprocal_maps_zero_to_zero() {
        assert_eq!(reciprocal_or_zero(&[0, 1, 2, 4]), vec![0.0, 1.0, 0.5, 0.25]);
    }

    #[test]
    fn matrix_rows() {
        let mut m = BatchMatrix::zeros(2, 3);
        m.data[3..].copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(m.row(1), &[1.0, 2.0, 3.0]);
        assert_eq!(m.to_rows(), vec![vec![0.0; 3], vec![1.0, 2.0, 3.0]]);
        assert_eq!(BatchMatrix::zeros(2, 0).to_rows(), vec![Vec::<f32>::new(); 2]);
    }
}
