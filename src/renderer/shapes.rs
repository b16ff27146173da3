//! Shape rasterization onto a character grid

use glam::DVec2;
use std::f64::consts::PI;

/// Points on a circle outline, evenly spaced
pub fn circle_outline(center: DVec2, radius: f64, segments: u32) -> Vec<DVec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let theta = (i as f64 / segments as f64) * 2.0 * PI;
            center + DVec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// Outline segment count that keeps neighbouring points about one cell apart
pub fn segments_for(radius: f64, cell: f64) -> u32 {
    let circumference = 2.0 * PI * radius;
    ((circumference / cell.max(1e-3)).ceil() as u32).clamp(12, 2048)
}

/// Fixed-size character canvas mapped onto a world rectangle
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: usize,
    rows: usize,
    /// World units per column
    scale_x: f64,
    /// World units per row
    scale_y: f64,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, world_width: f64, world_height: f64) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            scale_x: world_width / cols as f64,
            scale_y: world_height / rows as f64,
            cells: vec![' '; cols * rows],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// Smaller of the two cell dimensions, in world units
    pub fn cell_size(&self) -> f64 {
        self.scale_x.min(self.scale_y)
    }

    fn cell_of(&self, p: DVec2) -> Option<(usize, usize)> {
        let col = (p.x / self.scale_x).floor();
        let row = (p.y / self.scale_y).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    /// Set the cell under world point `p`; off-canvas points are ignored
    pub fn plot(&mut self, p: DVec2, ch: char) {
        if let Some((col, row)) = self.cell_of(p) {
            self.cells[row * self.cols + col] = ch;
        }
    }

    pub fn outline(&mut self, center: DVec2, radius: f64, ch: char) {
        let segments = segments_for(radius, self.cell_size());
        for p in circle_outline(center, radius, segments) {
            self.plot(p, ch);
        }
    }

    /// Fill every cell whose center lies inside the disc
    pub fn disc(&mut self, center: DVec2, radius: f64, ch: char) {
        let r2 = radius * radius;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = DVec2::new(
                    (col as f64 + 0.5) * self.scale_x,
                    (row as f64 + 0.5) * self.scale_y,
                );
                if p.distance_squared(center) <= r2 {
                    self.cells[row * self.cols + col] = ch;
                }
            }
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    /// Rows joined by newlines, trailing blanks trimmed
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_outline_points_on_radius() {
        let center = DVec2::new(10.0, 20.0);
        let points = circle_outline(center, 5.0, 16);
        assert_eq!(points.len(), 16);
        for p in points {
            assert!((p.distance(center) - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_plot_ignores_off_canvas() {
        let mut canvas = Canvas::new(10, 10, 100.0, 100.0);
        canvas.plot(DVec2::new(-1.0, 5.0), '#');
        canvas.plot(DVec2::new(100.0, 5.0), '#');
        canvas.plot(DVec2::new(55.0, 5.0), '#');
        assert_eq!(canvas.get(5, 0), Some('#'));
        assert_eq!(canvas.to_text().matches('#').count(), 1);
    }

    #[test]
    fn test_disc_fills_center_only() {
        let mut canvas = Canvas::new(10, 10, 100.0, 100.0);
        canvas.disc(DVec2::new(50.0, 50.0), 12.0, '@');
        assert_eq!(canvas.get(4, 4), Some('@'));
        assert_eq!(canvas.get(5, 5), Some('@'));
        assert_eq!(canvas.get(0, 0), Some(' '));
    }
}
