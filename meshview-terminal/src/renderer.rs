//! Character-cell renderer implementing the core's `Renderer` trait
//!
//! Faces arrive from the scene back-to-front and simply overwrite earlier
//! cells; the paint order is the whole visibility story, there is no depth
//! buffer here.
use std::io::Write;

use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::{Color, Renderer};
use nalgebra::Point2;

/// Face paint characters, dimmest to brightest, chosen by tint
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];
/// Vertices and edges draw as solid blocks
const WIRE_CHAR: char = '█';

#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    color: TermColor,
}

/// Cell buffer the scene paints into, flushed to the terminal per frame
pub struct CellRenderer {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
}

impl CellRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![None; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Viewport x (origin at center) to fractional cell column
    fn cell_x(&self, x: f64) -> f64 {
        x + self.width as f64 / 2.0
    }

    /// Viewport y (y up) to fractional cell row
    fn cell_y(&self, y: f64) -> f64 {
        self.height as f64 / 2.0 - y
    }

    fn plot(&mut self, col: i32, row: i32, ch: char, color: TermColor) {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return;
        }
        self.cells[row as usize * self.width + col as usize] = Some(Cell { ch, color });
    }

    fn fill_triangle(
        &mut self,
        a: (f64, f64),
        b: (f64, f64),
        c: (f64, f64),
        ch: char,
        color: TermColor,
    ) {
        let min_col = (a.0.min(b.0).min(c.0).floor() as i32).max(0);
        let max_col = (a.0.max(b.0).max(c.0).ceil() as i32).min(self.width as i32 - 1);
        let min_row = (a.1.min(b.1).min(c.1).floor() as i32).max(0);
        let max_row = (a.1.max(b.1).max(c.1).ceil() as i32).min(self.height as i32 - 1);

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let p = (col as f64, row as f64);
                if let Some((w0, w1, w2)) = barycentric(a, b, c, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(col, row, ch, color);
                    }
                }
            }
        }
    }

    /// Flush the cell buffer to the terminal
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.height {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..self.width {
                match self.cells[row * self.width + col] {
                    Some(cell) => {
                        writer.queue(SetForegroundColor(cell.color))?;
                        writer.queue(Print(cell.ch))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for CellRenderer {
    /// Bresenham line; the stroke width collapses to a single cell
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Color, _width: f64) {
        let mut col = self.cell_x(from.x).round() as i32;
        let mut row = self.cell_y(from.y).round() as i32;
        let end_col = self.cell_x(to.x).round() as i32;
        let end_row = self.cell_y(to.y).round() as i32;

        let d_col = (end_col - col).abs();
        let d_row = -(end_row - row).abs();
        let step_col = if col < end_col { 1 } else { -1 };
        let step_row = if row < end_row { 1 } else { -1 };
        let mut err = d_col + d_row;
        loop {
            self.plot(col, row, WIRE_CHAR, term_color(color));
            if col == end_col && row == end_row {
                break;
            }
            let e2 = 2 * err;
            if e2 >= d_row {
                err += d_row;
                col += step_col;
            }
            if e2 <= d_col {
                err += d_col;
                row += step_row;
            }
        }
    }

    /// Fan-triangulate and fill with the ramp character for the tint
    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color) {
        if points.len() < 3 {
            return;
        }
        let ch = ramp_char(color);
        let cells: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (self.cell_x(p.x), self.cell_y(p.y)))
            .collect();
        for i in 1..cells.len() - 1 {
            self.fill_triangle(cells[0], cells[i], cells[i + 1], ch, term_color(color));
        }
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color) {
        let cx = self.cell_x(center.x);
        let cy = self.cell_y(center.y);
        let min_col = ((cx - radius).floor() as i32).max(0);
        let max_col = ((cx + radius).ceil() as i32).min(self.width as i32 - 1);
        let min_row = ((cy - radius).floor() as i32).max(0);
        let max_row = ((cy + radius).ceil() as i32).min(self.height as i32 - 1);
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let dx = col as f64 - cx;
                let dy = row as f64 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.plot(col, row, WIRE_CHAR, term_color(color));
                }
            }
        }
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Face tints run 95..=255 in the blue channel; spread them over the ramp
fn ramp_char(color: Color) -> char {
    let t = (color.b.saturating_sub(95)) as usize * (LUMINOSITY_RAMP.len() - 1) / 160;
    LUMINOSITY_RAMP[t.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Barycentric coordinates of `p` in the triangle `(a, b, c)`, `None` for a
/// degenerate triangle
fn barycentric(
    a: (f64, f64),
    b: (f64, f64),
    c: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (b.1 - c.1) * (a.0 - c.0) + (c.0 - b.0) * (a.1 - c.1);
    if denom.abs() < 1e-9 {
        return None;
    }
    let w0 = ((b.1 - c.1) * (p.0 - c.0) + (c.0 - b.0) * (p.1 - c.1)) / denom;
    let w1 = ((c.1 - a.1) * (p.0 - c.0) + (a.0 - c.0) * (p.1 - c.1)) / denom;
    let w2 = 1.0 - w0 - w1;
    Some((w0, w1, w2))
}
