use crate::domain::model::{PenColor, Point, Segment, TreeDrawing, TreeParams};
use crate::utils::error::{KitError, Result};
use crate::utils::validation::{validate_min, validate_range, Validate};
use std::fmt::Write as _;

pub const START_POSITION: Point = Point { x: 0.0, y: -200.0 };
pub const ANGLE_RANGE: (f64, f64) = (0.0, 180.0);
pub const MIN_START_LENGTH: f64 = 1.0;
pub const DEPTH_RANGE: (u32, u32) = (1, 10);
pub const REDUCTION_RANGE: (f64, f64) = (0.1, 1.0);
const SVG_MARGIN: f64 = 20.0;

impl Validate for TreeParams {
    fn validate(&self) -> Result<()> {
        validate_range("angle_left", self.angle_left, ANGLE_RANGE.0, ANGLE_RANGE.1)?;
        validate_range("angle_right", self.angle_right, ANGLE_RANGE.0, ANGLE_RANGE.1)?;
        validate_min("start_length", self.start_length, MIN_START_LENGTH)?;
        if !self.start_length.is_finite() {
            return Err(KitError::InvalidConfigValueError {
                field: "start_length".to_string(),
                value: self.start_length.to_string(),
                reason: "Value must be a finite number".to_string(),
            });
        }
        validate_range("depth", self.depth, DEPTH_RANGE.0, DEPTH_RANGE.1)?;
        validate_range(
            "reduction_factor",
            self.reduction_factor,
            REDUCTION_RANGE.0,
            REDUCTION_RANGE.1,
        )
    }
}

/// 海龜繪圖的最小實作：只記錄筆畫，不開視窗。
#[derive(Debug, Clone)]
pub struct Turtle {
    position: Point,
    /// 角度制，0 = 朝右，逆時針為正
    heading: f64,
    color: PenColor,
    segments: Vec<Segment>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new(START_POSITION, 90.0)
    }
}

impl Turtle {
    pub fn new(position: Point, heading: f64) -> Self {
        Self {
            position,
            heading,
            color: PenColor::Brown,
            segments: Vec::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn set_color(&mut self, color: PenColor) {
        self.color = color;
    }

    pub fn left(&mut self, degrees: f64) {
        self.heading += degrees;
    }

    pub fn right(&mut self, degrees: f64) {
        self.heading -= degrees;
    }

    pub fn forward(&mut self, distance: f64) {
        let from = self.position;
        self.move_by(distance);
        self.segments.push(Segment {
            from,
            to: self.position,
            color: self.color,
        });
    }

    /// 沿原路退回；與前進筆畫重疊，因此不另外記錄。
    pub fn backward(&mut self, distance: f64) {
        self.move_by(-distance);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    fn move_by(&mut self, distance: f64) {
        let radians = self.heading.to_radians();
        self.position = Point {
            x: self.position.x + distance * radians.cos(),
            y: self.position.y + distance * radians.sin(),
        };
    }
}

fn pen_color(depth: u32, is_trunk: bool) -> PenColor {
    if is_trunk {
        PenColor::Brown
    } else if depth % 2 == 0 {
        PenColor::Green
    } else {
        PenColor::DarkGreen
    }
}

/// 從海龜目前位置畫出整棵樹，結束時海龜回到原位與原方向。
pub fn draw_tree(turtle: &mut Turtle, params: &TreeParams) {
    draw_branch(turtle, params.start_length, params, params.depth);
}

fn draw_branch(turtle: &mut Turtle, length: f64, params: &TreeParams, depth: u32) {
    if depth == 0 {
        return;
    }

    turtle.set_color(pen_color(depth, depth == params.depth));
    turtle.forward(length);

    let child = length * params.reduction_factor;

    turtle.left(params.angle_left);
    draw_branch(turtle, child, params, depth - 1);

    turtle.right(params.angle_left + params.angle_right);
    draw_branch(turtle, child, params, depth - 1);

    turtle.left(params.angle_right);
    turtle.backward(length);
}

pub fn render(params: &TreeParams) -> TreeDrawing {
    let mut turtle = Turtle::default();
    draw_tree(&mut turtle, params);
    TreeDrawing {
        segments: turtle.into_segments(),
    }
}

/// 輸出 SVG；座標 y 軸向上，轉成 SVG 時翻轉。
pub fn render_svg(segments: &[Segment]) -> String {
    let (min_x, max_x, min_y, max_y) = segments
        .iter()
        .flat_map(|s| [s.from, s.to])
        .fold(None, |bounds: Option<(f64, f64, f64, f64)>, p| {
            let (x0, x1, y0, y1) = bounds.unwrap_or((p.x, p.x, -p.y, -p.y));
            Some((x0.min(p.x), x1.max(p.x), y0.min(-p.y), y1.max(-p.y)))
        })
        .unwrap_or((0.0, 0.0, 0.0, 0.0));

    let view_x = min_x - SVG_MARGIN;
    let view_y = min_y - SVG_MARGIN;
    let width = (max_x - min_x) + 2.0 * SVG_MARGIN;
    let height = (max_y - min_y) + 2.0 * SVG_MARGIN;

    let mut svg = String::new();
    // 寫入 String 不會失敗
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.2} {:.2} {:.2} {:.2}" width="{:.0}" height="{:.0}">"#,
        view_x, view_y, width, height, width, height
    );
    let _ = writeln!(
        svg,
        r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="white"/>"#,
        view_x, view_y, width, height
    );
    for segment in segments {
        let _ = writeln!(
            svg,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-linecap="round"/>"#,
            segment.from.x,
            -segment.from.y,
            segment.to.x,
            -segment.to.y,
            segment.color.svg_name()
        );
    }
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(depth: u32) -> TreeParams {
        TreeParams {
            angle_left: 25.0,
            angle_right: 35.0,
            start_length: 100.0,
            depth,
            reduction_factor: 0.5,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_stroke_count_matches_depth() {
        for depth in 1..=10 {
            let drawing = render(&params(depth));
            assert_eq!(drawing.segments.len(), (1usize << depth) - 1, "depth {}", depth);
        }
    }

    #[test]
    fn test_turtle_pose_restored() {
        let mut turtle = Turtle::default();
        draw_tree(&mut turtle, &params(7));
        assert!(close(turtle.position().x, START_POSITION.x));
        assert!(close(turtle.position().y, START_POSITION.y));
        assert!(close(turtle.heading(), 90.0));
        assert_eq!(turtle.segments().len(), 127);
    }

    #[test]
    fn test_lengths_halve_per_level() {
        let drawing = render(&params(4));
        let lengths: Vec<f64> = drawing.segments.iter().map(|s| s.length()).collect();
        assert!(close(lengths[0], 100.0));
        assert!(close(lengths[1], 50.0));
        assert!(close(lengths[2], 25.0));
        assert!(close(lengths[3], 12.5));
        let shortest = lengths.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(close(shortest, 12.5));
    }

    #[test]
    fn test_single_level_is_vertical_trunk() {
        let drawing = render(&params(1));
        let trunk = drawing.segments[0];
        assert_eq!(trunk.color, PenColor::Brown);
        assert!(close(trunk.from.y, -200.0));
        assert!(close(trunk.to.x, 0.0));
        assert!(close(trunk.to.y, -100.0));
    }

    #[test]
    fn test_branch_colors() {
        let drawing = render(&params(3));
        let colors: Vec<PenColor> = drawing.segments.iter().map(|s| s.color).collect();
        // 樹幹、左枝 (depth 2)、其子 (depth 1) x2、右枝 (depth 2)、其子 x2
        assert_eq!(
            colors,
            vec![
                PenColor::Brown,
                PenColor::Green,
                PenColor::DarkGreen,
                PenColor::DarkGreen,
                PenColor::Green,
                PenColor::DarkGreen,
                PenColor::DarkGreen,
            ]
        );
    }

    #[test]
    fn test_left_branch_goes_left() {
        let drawing = render(&params(2));
        assert!(drawing.segments[1].to.x < 0.0);
        assert!(drawing.segments[2].to.x > 0.0);
    }

    #[test]
    fn test_symmetric_angles_mirror() {
        let mut p = params(5);
        p.angle_left = 30.0;
        p.angle_right = 30.0;
        let sum_x: f64 = render(&p).segments.iter().map(|s| s.to.x).sum();
        assert!(sum_x.abs() < 1e-6);
    }

    #[test]
    fn test_params_validation() {
        assert!(TreeParams::default().validate().is_ok());
        assert!(params(0).validate().is_err());
        assert!(params(11).validate().is_err());

        let mut p = params(3);
        p.reduction_factor = 1.5;
        assert!(p.validate().is_err());

        let mut p = params(3);
        p.angle_left = -1.0;
        assert!(p.validate().is_err());

        let mut p = params(3);
        p.start_length = f64::INFINITY;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_infinite_start_length_message_is_short() {
        let mut p = params(3);
        p.start_length = "1e309".parse().unwrap();

        match p.validate() {
            Err(KitError::InvalidConfigValueError { field, value, reason }) => {
                assert_eq!(field, "start_length");
                assert_eq!(value, "inf");
                assert_eq!(reason, "Value must be a finite number");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_render_svg() {
        let drawing = render(&params(2));
        let svg = render_svg(&drawing.segments);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<line ").count(), 3);
        assert!(svg.contains("stroke=\"brown\""));
        assert!(svg.contains("fill=\"white\""));
    }
}
