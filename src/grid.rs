// src/grid.rs
use ndarray::{Array1, Array2, Zip};

/// Create a meshgrid from x and y arrays, similar to numpy's meshgrid
pub fn meshgrid(x: &Array1<f64>, y: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let nx = x.len();
    let ny = y.len();

    // Every row of the x grid is `x`
    let mut x_grid = Array2::zeros((ny, nx));
    for i in 0..ny {
        x_grid.row_mut(i).assign(x);
    }

    // Every column of the y grid is `y`
    let mut y_grid = Array2::zeros((ny, nx));
    for j in 0..nx {
        y_grid.column_mut(j).assign(y);
    }

    (x_grid, y_grid)
}

/// Angle and distance of every pixel of a square frame, measured from its center.
///
/// Indexing is `[row, column]`; the horizontal offset is the column minus
/// the center and the vertical offset is the row minus the center.
#[derive(Debug, Clone)]
pub struct PolarGrid {
    pub theta: Array2<f64>,
    pub radius: Array2<f64>,
}

impl PolarGrid {
    pub fn new(height: usize) -> Self {
        let center = (height / 2) as f64;
        let offsets: Array1<f64> = (0..height).map(|i| i as f64 - center).collect();
        let (x_grid, y_grid) = meshgrid(&offsets, &offsets);

        let mut theta = Array2::zeros(x_grid.dim());
        let mut radius = Array2::zeros(x_grid.dim());
        Zip::from(&mut theta)
            .and(&mut radius)
            .and(&x_grid)
            .and(&y_grid)
            .par_for_each(|theta, radius, &x, &y| {
                *theta = y.atan2(x);
                *radius = x.hypot(y);
            });

        PolarGrid { theta, radius }
    }

    pub fn height(&self) -> usize {
        self.theta.nrows()
    }
}
