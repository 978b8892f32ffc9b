//! Terminal plots using braille graphics
//!
//! Renders survival curves and MTBF growth profiles as Unicode braille
//! canvases. NaN values break a curve into segments, so phase boundaries
//! show as gaps instead of connecting lines.

use drawille::Canvas;

/// Default canvas size for curve plots, in braille cells
pub const PLOT_WIDTH: u32 = 90;
pub const PLOT_HEIGHT: u32 = 30;

struct Extent {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Extent {
    fn of(xs: &[f64], ys: &[f64]) -> Option<Extent> {
        let mut extent: Option<Extent> = None;
        for (&x, &y) in xs.iter().zip(ys) {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            extent = Some(match extent {
                None => Extent {
                    x_min: x,
                    x_max: x,
                    y_min: y,
                    y_max: y,
                },
                Some(e) => Extent {
                    x_min: e.x_min.min(x),
                    x_max: e.x_max.max(x),
                    y_min: e.y_min.min(y),
                    y_max: e.y_max.max(y),
                },
            });
        }
        extent
    }

    fn scale(&self, x: f64, y: f64, width: u32, height: u32) -> (u32, u32) {
        let x_span = (self.x_max - self.x_min).max(f64::EPSILON);
        let y_span = (self.y_max - self.y_min).max(f64::EPSILON);
        let px = ((x - self.x_min) / x_span * f64::from(width - 1)).round() as u32;
        let py = ((y - self.y_min) / y_span * f64::from(height - 1)).round() as u32;
        // Canvas rows grow downward.
        (px, height - 1 - py)
    }
}

/// Render a connected line through `(x, y)` points
///
/// Non-finite values end the current segment, so curves with NaN gaps
/// render as disconnected pieces.
pub fn render_line(xs: &[f64], ys: &[f64], width: u32, height: u32) -> String {
    let Some(extent) = Extent::of(xs, ys) else {
        return "  (no finite points to plot)".to_string();
    };

    let mut canvas = Canvas::new(width, height);
    let mut last: Option<(u32, u32)> = None;
    for (&x, &y) in xs.iter().zip(ys) {
        if !x.is_finite() || !y.is_finite() {
            last = None;
            continue;
        }
        let point = extent.scale(x, y, width, height);
        match last {
            Some(prev) => canvas.line(prev.0, prev.1, point.0, point.1),
            None => canvas.set(point.0, point.1),
        }
        last = Some(point);
    }

    frame_with_axes(&canvas, &extent)
}

/// Render a right-continuous step function through `(x, y)` points
///
/// Each step holds its level until the next x, then drops vertically;
/// this is the natural shape for survival curves.
pub fn render_steps(xs: &[f64], ys: &[f64], width: u32, height: u32) -> String {
    let Some(extent) = Extent::of(xs, ys) else {
        return "  (no finite points to plot)".to_string();
    };

    let mut canvas = Canvas::new(width, height);
    let mut last: Option<(u32, u32)> = None;
    for (&x, &y) in xs.iter().zip(ys) {
        if !x.is_finite() || !y.is_finite() {
            last = None;
            continue;
        }
        let point = extent.scale(x, y, width, height);
        if let Some(prev) = last {
            // Hold the previous level, then step down at this time.
            canvas.line(prev.0, prev.1, point.0, prev.1);
            canvas.line(point.0, prev.1, point.0, point.1);
        } else {
            canvas.set(point.0, point.1);
        }
        last = Some(point);
    }

    frame_with_axes(&canvas, &extent)
}

fn frame_with_axes(canvas: &Canvas, extent: &Extent) -> String {
    format!(
        "{}\n  x: {:.4} .. {:.4}   y: {:.4} .. {:.4}",
        canvas.frame(),
        extent.x_min,
        extent.x_max,
        extent.y_min,
        extent.y_max
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_line_draws_something() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 0.8, 0.5, 0.2];
        let plot = render_line(&xs, &ys, 40, 12);

        assert!(plot.contains("x: 0.0000 .. 3.0000"));
        assert!(plot.contains("y: 0.2000 .. 1.0000"));
        assert!(plot.lines().count() > 1);
    }

    #[test]
    fn test_render_line_skips_nan_gaps() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, f64::NAN, 0.5, 0.2];
        let plot = render_line(&xs, &ys, 40, 12);
        assert!(plot.contains("y: 0.2000 .. 1.0000"));
    }

    #[test]
    fn test_render_steps_handles_empty_input() {
        assert_eq!(
            render_steps(&[], &[], 40, 12),
            "  (no finite points to plot)"
        );
    }

    #[test]
    fn test_render_flat_curve_does_not_panic() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.5, 0.5, 0.5];
        let plot = render_steps(&xs, &ys, 40, 12);
        assert!(plot.contains("y: 0.5000 .. 0.5000"));
    }
}
