use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LayerUniform {
    pub model: [[f32; 4]; 4],
}

/// Horizontal scroll position driving every layer's translation.
///
/// Owned by the engine state and passed explicitly into the update and render
/// steps; the transform math is plain CPU code so it stays testable without a
/// GPU. The offset is unbounded — scrolling never clamps.
pub struct ScrollCamera {
    pub offset: f32,
}

impl ScrollCamera {
    pub fn new() -> Self {
        Self { offset: 0.0 }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.offset += delta;
    }

    /// Horizontal translation for a layer with the given speed factor.
    /// Speed 0 pins the layer in place (infinitely distant); speed 1 tracks
    /// the camera exactly (foreground plane). The scene scrolls opposite to
    /// the camera, hence the negation.
    pub fn layer_translation(&self, speed: f32) -> f32 {
        -self.offset * speed
    }

    pub fn build_uniform(&self, speed: f32) -> LayerUniform {
        let model = Mat4::from_translation(Vec3::new(self.layer_translation(speed), 0.0, 0.0));
        LayerUniform {
            model: model.to_cols_array_2d(),
        }
    }
}

impl Default for ScrollCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_is_linear_in_offset_and_speed() {
        let mut camera = ScrollCamera::new();
        for &offset in &[-250.0f32, -1.0, 0.0, 0.5, 100.0, 4096.0] {
            camera.offset = offset;
            for &speed in &[0.0f32, 0.1, 0.3, 0.5, 0.75, 1.0] {
                assert_eq!(camera.layer_translation(speed), -offset * speed);
            }
        }
    }

    #[test]
    fn zero_speed_layer_never_moves() {
        let mut camera = ScrollCamera::new();
        for &offset in &[0.0f32, 12.5, -900.0, 1.0e6] {
            camera.offset = offset;
            assert_eq!(camera.layer_translation(0.0), 0.0);
        }
    }

    #[test]
    fn full_speed_layer_tracks_camera_exactly() {
        let mut camera = ScrollCamera::new();
        for &offset in &[0.0f32, 1.0, -33.0, 777.25] {
            camera.offset = offset;
            assert_eq!(camera.layer_translation(1.0), -offset);
        }
    }

    #[test]
    fn scroll_by_accumulates_without_clamping() {
        let mut camera = ScrollCamera::new();
        for _ in 0..1000 {
            camera.scroll_by(0.01);
        }
        assert!((camera.offset - 10.0).abs() < 1e-3);
        camera.scroll_by(-1.0e7);
        assert!(camera.offset < -9.0e6);
    }

    #[test]
    fn uniform_is_translation_only() {
        let mut camera = ScrollCamera::new();
        camera.offset = 100.0;
        let uniform = camera.build_uniform(0.5);

        // Column-major: rotation/scale block stays identity, the translation
        // lands in column 3.
        let m = uniform.model;
        assert_eq!(m[3][0], -50.0);
        assert_eq!(m[3][1], 0.0);
        assert_eq!(m[3][2], 0.0);
        assert_eq!(m[3][3], 1.0);
        for col in 0..3 {
            for row in 0..4 {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert_eq!(m[col][row], expected, "col {col} row {row}");
            }
        }
    }
}
