use cgmath::{Matrix4, Vector3, vec3};

use super::ArcSolution;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcRenderConfig {
    pub landing_scale: Vector3<f32>,
    pub landing_height_offset: f32,
}

impl Default for ArcRenderConfig {
    fn default() -> Self {
        Self {
            landing_scale: vec3(0.3, 0.02, 0.3),
            landing_height_offset: 0.02,
        }
    }
}

/// Line segment list for the host's curve renderer; consecutive pairs are
/// the start and end of one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcLines {
    pub vertices: Vec<Vector3<f32>>,
    pub color: Vector3<f32>,
}

pub struct ArcRenderer;

impl ArcRenderer {
    /// Build a line list matching the arc samples for quick visualization.
    pub fn create_arc_lines(solution: &ArcSolution, color: Vector3<f32>) -> Option<ArcLines> {
        if solution.samples.len() < 2 {
            return None;
        }

        let mut vertices = Vec::with_capacity((solution.samples.len() - 1) * 2);
        for pair in solution.samples.windows(2) {
            vertices.push(pair[0].position);
            vertices.push(pair[1].position);
        }

        Some(ArcLines { vertices, color })
    }

    /// Transform for the flat landing indicator so players can see the destination.
    pub fn target_indicator_transform(position: Vector3<f32>, config: ArcRenderConfig) -> Matrix4<f32> {
        let translation =
            Matrix4::from_translation(position + vec3(0.0, config.landing_height_offset, 0.0));
        let scale = Matrix4::from_nonuniform_scale(
            config.landing_scale.x,
            config.landing_scale.y,
            config.landing_scale.z,
        );
        translation * scale
    }
}
