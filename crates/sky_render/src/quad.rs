use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(QuadVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(QuadVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

pub const UNIT_QUAD_VERTEX_COUNT: u32 = 6;

/// Two triangles covering [-1, 1]² with UV origin at the bottom-left,
/// matching the vertical flip applied at texture decode time. Every layer
/// draws this same buffer; only the transform uniform differs per draw.
const UNIT_QUAD: [QuadVertex; 6] = [
    QuadVertex {
        position: [-1.0, -1.0],
        tex_coords: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
        tex_coords: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        tex_coords: [1.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        tex_coords: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        tex_coords: [0.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, -1.0],
        tex_coords: [0.0, 0.0],
    },
];

pub fn create_unit_quad(device: &wgpu::Device) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Unit Quad Vertex Buffer"),
        contents: bytemuck::cast_slice(&UNIT_QUAD),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_the_unit_square() {
        for v in &UNIT_QUAD {
            assert!(v.position[0] == -1.0 || v.position[0] == 1.0);
            assert!(v.position[1] == -1.0 || v.position[1] == 1.0);
        }
        let min_x = UNIT_QUAD.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = UNIT_QUAD.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!((min_x, max_x), (-1.0, 1.0));
    }

    #[test]
    fn uvs_follow_positions() {
        // u and v map [-1, 1] position onto [0, 1] on each vertex.
        for v in &UNIT_QUAD {
            assert_eq!(v.tex_coords[0], (v.position[0] + 1.0) * 0.5);
            assert_eq!(v.tex_coords[1], (v.position[1] + 1.0) * 0.5);
        }
    }

    #[test]
    fn both_triangles_wind_counter_clockwise() {
        for tri in UNIT_QUAD.chunks(3) {
            let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position];
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }

    #[test]
    fn vertex_stride_is_four_floats() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
        let layout = QuadVertex::layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes[1].offset, 8);
    }
}
