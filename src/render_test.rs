#![allow(clippy::float_cmp)]

use super::*;
use crate::camera::Cell;

// =============================================================
// Helpers
// =============================================================

#[derive(Debug, Clone, PartialEq)]
enum Cmd {
    Clear(f64, f64, f64, f64),
    Save,
    Restore,
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    StrokeStyle(String),
    FillStyle(String),
    Font(String),
    TextAlign(String),
    FillText(String, f64, f64),
}

#[derive(Default)]
struct Recorder {
    cmds: Vec<Cmd>,
    fail_text: bool,
}

impl Surface for Recorder {
    type Error = String;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.cmds.push(Cmd::Clear(x, y, w, h));
    }
    fn save(&mut self) {
        self.cmds.push(Cmd::Save);
    }
    fn restore(&mut self) {
        self.cmds.push(Cmd::Restore);
    }
    fn begin_path(&mut self) {
        self.cmds.push(Cmd::BeginPath);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.cmds.push(Cmd::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.cmds.push(Cmd::LineTo(x, y));
    }
    fn stroke(&mut self) {
        self.cmds.push(Cmd::Stroke);
    }
    fn set_stroke_style(&mut self, color: &str) {
        self.cmds.push(Cmd::StrokeStyle(color.to_owned()));
    }
    fn set_fill_style(&mut self, color: &str) {
        self.cmds.push(Cmd::FillStyle(color.to_owned()));
    }
    fn set_font(&mut self, font: &str) {
        self.cmds.push(Cmd::Font(font.to_owned()));
    }
    fn set_text_align(&mut self, align: &str) {
        self.cmds.push(Cmd::TextAlign(align.to_owned()));
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), String> {
        if self.fail_text {
            return Err("fill_text rejected".to_owned());
        }
        self.cmds.push(Cmd::FillText(text.to_owned(), x, y));
        Ok(())
    }
}

impl Recorder {
    fn count(&self, pred: impl Fn(&Cmd) -> bool) -> usize {
        self.cmds.iter().filter(|c| pred(*c)).count()
    }

    fn segments(&self) -> Vec<((f64, f64), (f64, f64))> {
        self.cmds
            .windows(2)
            .filter_map(|w| match (&w[0], &w[1]) {
                (Cmd::MoveTo(ax, ay), Cmd::LineTo(bx, by)) => Some(((*ax, *ay), (*bx, *by))),
                _ => None,
            })
            .collect()
    }

    fn labels(&self) -> Vec<String> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::FillText(t, _, _) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }
}

fn camera(offset_x: f64, offset_y: f64, scale: f64) -> Camera {
    Camera { offset: Point::new(offset_x, offset_y), scale }
}

fn hexagon() -> Vec<Point> {
    MapConfig::default().border_pixels()
}

fn grid_only(draw_grid: bool, debug_mode: bool) -> MapConfig {
    MapConfig { draw_grid, debug_mode, border: Vec::new(), ..MapConfig::default() }
}

// =============================================================
// grid_line_positions
// =============================================================

#[test]
fn grid_lines_at_origin_start_at_zero() {
    let xs = grid_line_positions(0.0, 1.0, 35.0, 140.0);
    assert_eq!(xs, vec![0.0, 35.0, 70.0, 105.0]);
}

#[test]
fn grid_lines_exclude_limit() {
    let xs = grid_line_positions(0.0, 1.0, 35.0, 105.0);
    assert_eq!(xs, vec![0.0, 35.0, 70.0]);
}

#[test]
fn grid_lines_follow_negative_offset() {
    // Offset -50 puts the line of cell 2 at world 70 -> screen 20.
    let xs = grid_line_positions(-50.0, 1.0, 35.0, 100.0);
    assert_eq!(xs, vec![20.0, 55.0, 90.0]);
}

#[test]
fn grid_lines_scaled_spacing() {
    let xs = grid_line_positions(0.0, 2.0, 35.0, 200.0);
    assert_eq!(xs, vec![0.0, 70.0, 140.0]);
}

#[test]
fn grid_lines_zero_scale_is_empty() {
    assert!(grid_line_positions(0.0, 0.0, 35.0, 700.0).is_empty());
}

#[test]
fn grid_lines_nan_scale_is_empty() {
    assert!(grid_line_positions(0.0, f64::NAN, 35.0, 700.0).is_empty());
}

#[test]
fn grid_lines_first_within_one_step() {
    for offset in [-1.0, -34.0, -35.0, -36.0, -1234.5] {
        let xs = grid_line_positions(offset, 1.3, 35.0, 700.0);
        assert!(xs[0] >= 0.0 && xs[0] < 35.0 * 1.3, "offset {offset}: {}", xs[0]);
    }
}

// =============================================================
// draw_grid
// =============================================================

#[test]
fn grid_clears_viewport_first() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &Camera::default(), &grid_only(true, false), Viewport::new(70.0, 35.0)).unwrap();
    assert_eq!(rec.cmds[0], Cmd::Clear(0.0, 0.0, 70.0, 35.0));
}

#[test]
fn grid_lines_span_viewport() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &Camera::default(), &grid_only(true, false), Viewport::new(70.0, 35.0)).unwrap();
    let segments = rec.segments();
    assert_eq!(
        segments,
        vec![((0.0, 0.0), (0.0, 35.0)), ((35.0, 0.0), (35.0, 35.0)), ((0.0, 0.0), (70.0, 0.0))]
    );
    assert!(rec.cmds.contains(&Cmd::StrokeStyle("#ccc".to_owned())));
    assert_eq!(rec.count(|c| *c == Cmd::Stroke), 1);
}

#[test]
fn grid_save_restore_balanced() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &Camera::default(), &MapConfig::default(), Viewport::new(700.0, 700.0)).unwrap();
    assert_eq!(rec.count(|c| *c == Cmd::Save), rec.count(|c| *c == Cmd::Restore));
}

#[test]
fn grid_hidden_at_threshold_scale() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &camera(0.0, 0.0, 0.6), &grid_only(true, false), Viewport::new(700.0, 700.0)).unwrap();
    assert!(rec.segments().is_empty());
    assert_eq!(rec.cmds, vec![Cmd::Clear(0.0, 0.0, 700.0, 700.0)]);
}

#[test]
fn grid_shown_just_above_threshold() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &camera(0.0, 0.0, 0.7), &grid_only(true, false), Viewport::new(700.0, 700.0)).unwrap();
    assert!(!rec.segments().is_empty());
}

#[test]
fn grid_disabled_only_clears() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &Camera::default(), &grid_only(false, false), Viewport::new(700.0, 700.0)).unwrap();
    assert_eq!(rec.cmds, vec![Cmd::Clear(0.0, 0.0, 700.0, 700.0)]);
}

#[test]
fn debug_labels_drawn_below_threshold() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &camera(0.0, 0.0, 0.5), &grid_only(true, true), Viewport::new(35.0, 35.0)).unwrap();
    assert!(rec.segments().is_empty());
    assert_eq!(rec.labels(), vec!["0", "1", "0", "1"]);
}

#[test]
fn debug_labels_use_cell_index_and_position() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &camera(-70.0, -35.0, 1.0), &grid_only(false, true), Viewport::new(70.0, 35.0)).unwrap();
    let texts: Vec<_> = rec
        .cmds
        .iter()
        .filter(|c| matches!(c, Cmd::FillText(..)))
        .cloned()
        .collect();
    assert_eq!(
        texts,
        vec![
            Cmd::FillText("2".to_owned(), 17.5, 22.5),
            Cmd::FillText("3".to_owned(), 52.5, 22.5),
            Cmd::FillText("1".to_owned(), 17.5, 22.5),
        ]
    );
}

#[test]
fn debug_label_font_scales() {
    let mut rec = Recorder::default();
    draw_grid(&mut rec, &camera(0.0, 0.0, 2.0), &grid_only(false, true), Viewport::new(70.0, 70.0)).unwrap();
    assert!(rec.cmds.contains(&Cmd::Font("40px serif".to_owned())));
    assert!(rec.cmds.contains(&Cmd::TextAlign("center".to_owned())));
    assert!(rec.cmds.contains(&Cmd::FillStyle("#999".to_owned())));
}

#[test]
fn label_failure_propagates_and_restores() {
    let mut rec = Recorder { fail_text: true, ..Recorder::default() };
    let result = draw_grid(&mut rec, &Camera::default(), &grid_only(true, true), Viewport::new(70.0, 70.0));
    assert_eq!(result, Err("fill_text rejected".to_owned()));
    assert_eq!(rec.cmds.last(), Some(&Cmd::Restore));
}

#[test]
fn grid_draw_is_idempotent() {
    let cam = camera(-123.0, -456.0, 1.7);
    let config = MapConfig::default();
    let mut a = Recorder::default();
    let mut b = Recorder::default();
    draw_scene(&mut a, &cam, &config, Viewport::new(640.0, 480.0)).unwrap();
    draw_scene(&mut b, &cam, &config, Viewport::new(640.0, 480.0)).unwrap();
    assert_eq!(a.cmds, b.cmds);
}

// =============================================================
// Border
// =============================================================

#[test]
fn border_draws_six_closed_segments() {
    let mut rec = Recorder::default();
    draw_border(&mut rec, &Camera::default(), &hexagon());
    let segments = rec.segments();
    assert_eq!(
        segments,
        vec![
            ((35.0, 35.0), (35.0, 175.0)),
            ((35.0, 175.0), (140.0, 175.0)),
            ((140.0, 175.0), (140.0, 245.0)),
            ((140.0, 245.0), (245.0, 245.0)),
            ((245.0, 245.0), (245.0, 35.0)),
            ((245.0, 35.0), (35.0, 35.0)),
        ]
    );
    assert!(rec.cmds.contains(&Cmd::StrokeStyle("#000".to_owned())));
    assert_eq!(rec.count(|c| *c == Cmd::Stroke), 1);
    assert_eq!(rec.cmds.first(), Some(&Cmd::Save));
    assert_eq!(rec.cmds.last(), Some(&Cmd::Restore));
}

#[test]
fn border_follows_camera() {
    let mut rec = Recorder::default();
    draw_border(&mut rec, &camera(-35.0, -35.0, 2.0), &hexagon());
    let segments = rec.segments();
    assert_eq!(segments[0], ((0.0, 0.0), (0.0, 280.0)));
}

#[test]
fn border_culled_when_max_x_off_left() {
    // Max x is 245; offset -246 puts it at screen -1.
    let cam = camera(-246.0, 0.0, 1.0);
    assert!(border_culled(&cam, &hexagon()));
    let mut rec = Recorder::default();
    draw_border(&mut rec, &cam, &hexagon());
    assert!(rec.cmds.is_empty());
}

#[test]
fn border_culled_when_max_y_off_top() {
    let cam = camera(0.0, -300.0, 1.0);
    let mut rec = Recorder::default();
    draw_border(&mut rec, &cam, &hexagon());
    assert!(rec.cmds.is_empty());
}

#[test]
fn border_partially_visible_still_draws() {
    let cam = camera(-200.0, -200.0, 1.0);
    assert!(!border_culled(&cam, &hexagon()));
}

#[test]
fn border_off_bottom_right_is_not_culled() {
    // The heuristic only looks at the top/left edges of the screen.
    let cam = camera(0.0, 0.0, 3.0);
    let far = vec![Point::new(10_000.0, 10_000.0), Point::new(10_100.0, 10_000.0), Point::new(10_100.0, 10_100.0)];
    assert!(!border_culled(&cam, &far));
}

#[test]
fn empty_border_draws_nothing() {
    let mut rec = Recorder::default();
    draw_border(&mut rec, &Camera::default(), &[]);
    assert!(rec.cmds.is_empty());
}

#[test]
fn single_vertex_border_is_degenerate_loop() {
    let mut rec = Recorder::default();
    draw_border(&mut rec, &Camera::default(), &[Point::new(5.0, 5.0)]);
    assert_eq!(rec.segments(), vec![((5.0, 5.0), (5.0, 5.0))]);
}

// =============================================================
// Scene
// =============================================================

#[test]
fn scene_draws_border_after_grid() {
    let mut rec = Recorder::default();
    let config = MapConfig { border: vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)], ..MapConfig::default() };
    draw_scene(&mut rec, &Camera::default(), &config, Viewport::new(70.0, 70.0)).unwrap();
    let grid_stroke = rec.cmds.iter().position(|c| *c == Cmd::StrokeStyle("#ccc".to_owned())).unwrap();
    let border_stroke = rec.cmds.iter().position(|c| *c == Cmd::StrokeStyle("#000".to_owned())).unwrap();
    assert!(grid_stroke < border_stroke);
    assert_eq!(rec.count(|c| *c == Cmd::Stroke), 2);
}

#[test]
fn scene_label_failure_skips_border() {
    let mut rec = Recorder { fail_text: true, ..Recorder::default() };
    let result = draw_scene(&mut rec, &Camera::default(), &MapConfig::default(), Viewport::new(70.0, 70.0));
    assert!(result.is_err());
    assert!(!rec.cmds.contains(&Cmd::StrokeStyle("#000".to_owned())));
}
