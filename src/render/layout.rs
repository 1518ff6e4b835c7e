use std::collections::HashSet;
use thiserror::Error;

use crate::render::backend::GlBackend;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("attribute {location} ends at byte {end}, past the stride of {stride}")]
    AttributeOverflow { location: u32, end: u64, stride: u32 },
    #[error("attribute {location} has a stride of {stride} bytes, more than GL accepts")]
    StrideTooLarge { location: u32, stride: u32 },
    #[error("attribute location {0} declared twice")]
    DuplicateLocation(u32),
    #[error("attribute {location} has {components} components, expected 1..=4")]
    InvalidComponentCount { location: u32, components: u8 },
    #[error("vertex data of {bytes} bytes is not a whole number of {stride}-byte vertices")]
    PartialVertex { bytes: usize, stride: u32 },
}

/// Component type of a vertex attribute as stored in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribKind {
    Float,
    UnsignedByte,
    Int,
    UnsignedInt,
}

impl AttribKind {
    pub fn size(self) -> usize {
        match self {
            AttribKind::Float | AttribKind::Int | AttribKind::UnsignedInt => 4,
            AttribKind::UnsignedByte => 1,
        }
    }
}

/// One generic vertex attribute: where the vertex shader reads it
/// (`location`) and how to pull it out of an interleaved buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u8,
    pub kind: AttribKind,
    pub normalized: bool,
    /// Bytes between the starts of consecutive vertices.
    pub stride: u32,
    /// Bytes from the start of a vertex to this attribute.
    pub offset: u32,
}

impl VertexAttribute {
    pub fn float(location: u32, components: u8, stride: u32, offset: u32) -> Self {
        Self {
            location,
            components,
            kind: AttribKind::Float,
            normalized: false,
            stride,
            offset,
        }
    }

    /// Byte just past the last component of this attribute within a vertex.
    /// Computed in `u64` so offsets near `u32::MAX` cannot wrap.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.components) * self.kind.size() as u64
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if !(1..=4).contains(&self.components) {
            return Err(LayoutError::InvalidComponentCount {
                location: self.location,
                components: self.components,
            });
        }
        if self.stride > i32::MAX as u32 {
            return Err(LayoutError::StrideTooLarge {
                location: self.location,
                stride: self.stride,
            });
        }
        if self.end() > u64::from(self.stride) {
            return Err(LayoutError::AttributeOverflow {
                location: self.location,
                end: self.end(),
                stride: self.stride,
            });
        }
        Ok(())
    }
}

/// Ordered attribute list describing one interleaved vertex format.
///
/// The layout holds no GL state. [`VertexLayout::apply`] writes it into
/// whatever vertex array and vertex buffer are bound at the time, and may be
/// repeated with the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn new(attributes: Vec<VertexAttribute>) -> Result<Self, LayoutError> {
        let mut seen = HashSet::new();
        for attribute in &attributes {
            attribute.validate()?;
            if !seen.insert(attribute.location) {
                return Err(LayoutError::DuplicateLocation(attribute.location));
            }
        }
        Ok(Self { attributes })
    }

    /// Tightly packed `f32` attributes, in the given order, sharing one stride.
    ///
    /// `interleaved_f32(&[(0, 3), (1, 3), (2, 2)])` is position + color + uv
    /// with offsets 0/12/24 and a stride of 32.
    pub fn interleaved_f32(attributes: &[(u32, u8)]) -> Result<Self, LayoutError> {
        let float = AttribKind::Float.size() as u32;
        let stride = attributes
            .iter()
            .map(|&(_, components)| components as u32 * float)
            .sum();

        let mut offset = 0;
        let mut described = Vec::with_capacity(attributes.len());
        for &(location, components) in attributes {
            described.push(VertexAttribute::float(location, components, stride, offset));
            offset += components as u32 * float;
        }
        Self::new(described)
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Largest stride among the attributes, i.e. the size of one vertex.
    pub fn stride(&self) -> u32 {
        self.attributes
            .iter()
            .map(|attribute| attribute.stride)
            .max()
            .unwrap_or(0)
    }

    /// Number of whole vertices in `bytes` of vertex data.
    pub fn vertex_count(&self, bytes: usize) -> Result<usize, LayoutError> {
        let stride = self.stride();
        if stride == 0 || bytes % stride as usize != 0 {
            return Err(LayoutError::PartialVertex { bytes, stride });
        }
        Ok(bytes / stride as usize)
    }

    /// Points each attribute at the bound vertex buffer and enables it in the
    /// bound vertex array.
    pub fn apply<B: GlBackend>(&self, gl: &B) {
        for attribute in &self.attributes {
            debug_assert!(
                attribute.validate().is_ok(),
                "malformed vertex attribute {:?}",
                attribute
            );
            gl.vertex_attrib_pointer(attribute);
            gl.enable_vertex_attrib_array(attribute.location);
        }
    }
}
