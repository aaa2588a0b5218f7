use crate::backend::RenderError;
use glam::Mat4;

/// Deepest nesting a frame may reach.
pub const MAX_TRANSFORM_DEPTH: usize = 32;

/// Model transform stack with push-multiplies semantics.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self, transform: Mat4) -> Result<(), RenderError> {
        if self.saved.len() >= MAX_TRANSFORM_DEPTH {
            return Err(RenderError::TransformOverflow(MAX_TRANSFORM_DEPTH));
        }
        self.saved.push(self.current);
        self.current *= transform;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<(), RenderError> {
        self.current = self.saved.pop().ok_or(RenderError::TransformUnderflow)?;
        Ok(())
    }

    /// Back to identity with nothing saved.
    pub fn reset(&mut self) {
        self.current = Mat4::IDENTITY;
        self.saved.clear();
    }
}
