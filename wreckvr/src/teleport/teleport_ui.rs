use cgmath::{Matrix4, Vector3, vec3};

use super::{ArcLines, ArcRenderConfig, ArcRenderer, ArcSolution};

/// Where the aimed floor sits relative to the height the charge started at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorLevel {
    Above,
    Level,
    Below,
}

impl FloorLevel {
    pub fn classify(floor_height: f32, origin_height: f32) -> FloorLevel {
        let delta = floor_height - origin_height;
        if delta > LEVEL_TOLERANCE {
            FloorLevel::Above
        } else if delta < -LEVEL_TOLERANCE {
            FloorLevel::Below
        } else {
            FloorLevel::Level
        }
    }
}

const LEVEL_TOLERANCE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportVisualStyle {
    pub valid_arc_color: Vector3<f32>,
    pub invalid_arc_color: Vector3<f32>,
    pub level_target_color: Vector3<f32>,
    pub above_target_color: Vector3<f32>,
    pub below_target_color: Vector3<f32>,
    pub invalid_target_color: Vector3<f32>,
    pub landing_scale: Vector3<f32>,
    pub landing_height_offset: f32,
}

impl Default for TeleportVisualStyle {
    fn default() -> Self {
        Self {
            valid_arc_color: vec3(0.0, 0.8, 1.0),
            invalid_arc_color: vec3(1.0, 0.35, 0.1),
            level_target_color: vec3(0.1, 0.9, 1.0),
            above_target_color: vec3(0.2, 1.0, 0.4),
            below_target_color: vec3(0.9, 0.4, 1.0),
            invalid_target_color: vec3(1.0, 0.4, 0.15),
            landing_scale: vec3(1.2, 0.02, 1.2),
            landing_height_offset: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeleportMarker {
    pub transform: Matrix4<f32>,
    pub color: Vector3<f32>,
    pub floor_level: FloorLevel,
    pub valid: bool,
}

/// Everything the host needs to draw one tick of a teleport charge.
#[derive(Clone, Debug, PartialEq)]
pub struct TeleportVisual {
    /// Omitted when the comfort profile hides the arc
    pub arc: Option<ArcLines>,
    pub marker: TeleportMarker,
}

pub struct TeleportUI;

impl TeleportUI {
    pub fn build_visual(
        solution: &ArcSolution,
        floor_height: f32,
        origin_height: f32,
        show_arc: bool,
        style: &TeleportVisualStyle,
    ) -> TeleportVisual {
        let valid = solution.landing.valid;

        let arc = if show_arc {
            let arc_color = if valid {
                style.valid_arc_color
            } else {
                style.invalid_arc_color
            };
            ArcRenderer::create_arc_lines(solution, arc_color)
        } else {
            None
        };

        let floor_level = FloorLevel::classify(floor_height, origin_height);
        let color = if !valid {
            style.invalid_target_color
        } else {
            match floor_level {
                FloorLevel::Above => style.above_target_color,
                FloorLevel::Level => style.level_target_color,
                FloorLevel::Below => style.below_target_color,
            }
        };

        let render_config = ArcRenderConfig {
            landing_scale: style.landing_scale,
            landing_height_offset: style.landing_height_offset,
        };
        let mut marker_position = solution.landing.position;
        marker_position.y = floor_height;

        TeleportVisual {
            arc,
            marker: TeleportMarker {
                transform: ArcRenderer::target_indicator_transform(marker_position, render_config),
                color,
                floor_level,
                valid,
            },
        }
    }
}
