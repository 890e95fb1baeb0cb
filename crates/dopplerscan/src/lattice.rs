//! A*_n covering lattices scaled to a target mismatch.
//!
//! Construction
//! - A*_n is the orthogonal projection of Z^(n+1) onto the zero-sum
//!   hyperplane; a basis is `e_i - 1/(n+1)`, whose Gram matrix is
//!   `Γ = I - J/(n+1)` (J the all-ones matrix).
//! - A square generator with the same Gram matrix is obtained from the
//!   Cholesky factor of Γ, reversed so the factor is *upper* triangular:
//!   the basis row of the last index axis then points purely along the last
//!   canonical coordinate, and trailing axes never perturb leading
//!   coordinates. Degenerate regions (point-like sky, zero-band spins)
//!   constrain the leading coordinates, so this orientation lets the walk
//!   step the free trailing coordinates without leaving the region.
//! - The covering radius of the Γ-normalized basis is
//!   `ρ_n = sqrt(n(n+2) / (12(n+1)))`; scaling by `sqrt(μ)/ρ_n` makes the
//!   covering radius `sqrt(μ)`, and a final basis change with the inverse
//!   transposed Cholesky factor of the metric `g = L Lᵀ` carries that
//!   covering property into the metric.

use nalgebra::{Cholesky, DMatrix};

use crate::error::ScanError;

/// Covering radius of the A*_n basis returned by [`an_star_basis`].
pub fn an_star_covering_radius(dim: usize) -> f64 {
    let n = dim as f64;
    (n * (n + 2.0) / (12.0 * (n + 1.0))).sqrt()
}

/// Square (upper-triangular) generator of A*_n with Gram matrix
/// `I - J/(n+1)`; rows are basis vectors.
pub fn an_star_basis(dim: usize) -> Result<DMatrix<f64>, ScanError> {
    if dim == 0 {
        return Err(ScanError::InvalidArgument("lattice dimension must be >= 1"));
    }
    let inv = 1.0 / (dim as f64 + 1.0);
    let gamma = DMatrix::from_fn(dim, dim, |i, j| if i == j { 1.0 - inv } else { -inv });
    // Γ is positive definite for every n >= 1
    let l = Cholesky::new(gamma)
        .ok_or(ScanError::MetricNotPositiveDefinite)?
        .unpack();
    // reverse rows and columns: B = P L P is upper triangular, B Bᵀ = Γ
    Ok(DMatrix::from_fn(dim, dim, |i, j| {
        l[(dim - 1 - i, dim - 1 - j)]
    }))
}

/// Generator of the covering lattice for metric `g` and mismatch `mu`:
/// every point of R^n lies within metric distance `sqrt(mu)` of a lattice
/// point. Rows are basis vectors in the metric's coordinates.
pub fn covering_generator(g: &DMatrix<f64>, mu: f64) -> Result<DMatrix<f64>, ScanError> {
    let dim = g.nrows();
    if g.ncols() != dim || dim == 0 {
        return Err(ScanError::DimensionMismatch {
            expected: dim.max(1),
            got: g.ncols(),
        });
    }
    if !(mu > 0.0) {
        return Err(ScanError::InvalidArgument("mismatch must be positive"));
    }

    let scale = mu.sqrt() / an_star_covering_radius(dim);
    let basis = an_star_basis(dim)? * scale;

    let lg = Cholesky::new(g.clone())
        .ok_or(ScanError::MetricNotPositiveDefinite)?
        .unpack();
    // G = B L⁻ᵀ  ⇔  L Gᵀ = Bᵀ
    let gt = lg
        .solve_lower_triangular(&basis.transpose())
        .ok_or(ScanError::MetricNotPositiveDefinite)?;
    Ok(gt.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_dimensional_lattice_has_spacing_twice_radius() {
        // covering radius of a 1D lattice is half its spacing
        let g = DMatrix::identity(1, 1);
        let gen = covering_generator(&g, 0.04).unwrap();
        assert!((gen[(0, 0)].abs() - 2.0 * 0.2).abs() < 1e-12);
    }

    #[test]
    fn basis_gram_matrix_matches_an_star() {
        for dim in 1..=5 {
            let b = an_star_basis(dim).unwrap();
            let gram = &b * b.transpose();
            let inv = 1.0 / (dim as f64 + 1.0);
            for i in 0..dim {
                for j in 0..dim {
                    let expect = if i == j { 1.0 - inv } else { -inv };
                    assert!(
                        (gram[(i, j)] - expect).abs() < 1e-12,
                        "dim {dim} entry ({i},{j})"
                    );
                }
            }
        }
    }

    #[test]
    fn basis_is_upper_triangular() {
        let b = an_star_basis(4).unwrap();
        for i in 0..4 {
            for j in 0..i {
                assert_eq!(b[(i, j)], 0.0);
            }
        }
        // last row points purely along the last coordinate
        assert!(b[(3, 3)] > 0.0);
    }

    #[test]
    fn generator_distances_are_euclidean_in_lattice_coordinates() {
        // metric distance of basis row i equals the Euclidean norm of the
        // scaled A*_n basis row
        let g = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![4.0, 0.25, 1.0]));
        let mu = 0.01;
        let gen = covering_generator(&g, mu).unwrap();
        let scale = mu.sqrt() / an_star_covering_radius(3);
        let b = an_star_basis(3).unwrap() * scale;
        for i in 0..3 {
            let row = gen.row(i);
            let d2 = (row * &g).dot(&row);
            let expect = b.row(i).norm_squared();
            assert!((d2 - expect).abs() < 1e-12);
        }
    }

    #[test]
    fn non_positive_definite_metric_is_rejected() {
        let mut g = DMatrix::identity(3, 3);
        g[(2, 2)] = -1.0;
        assert!(matches!(
            covering_generator(&g, 0.01),
            Err(ScanError::MetricNotPositiveDefinite)
        ));
        let g = DMatrix::identity(2, 2);
        assert!(matches!(
            covering_generator(&g, 0.0),
            Err(ScanError::InvalidArgument(_))
        ));
    }
}
