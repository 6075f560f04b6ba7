//! Vertex type handed to the host renderer

use bytemuck::{Pod, Zeroable};

/// 2D pixel-space vertex with RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Raw bytes for a vertex buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Tube palette
pub mod colors {
    pub const VIEW_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const VIEW_BORDER: [f32; 4] = [50.0 / 255.0, 50.0 / 255.0, 80.0 / 255.0, 1.0];
    pub const BEAM: [f32; 4] = [50.0 / 255.0, 1.0, 50.0 / 255.0, 1.0];
    pub const PLATE: [f32; 4] = [200.0 / 255.0, 200.0 / 255.0, 0.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let verts = [Vertex::new(1.0, 2.0, colors::BEAM); 3];
        assert_eq!(as_bytes(&verts).len(), 72);
    }
}
