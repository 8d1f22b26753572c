use crate::core::Viewport;
use crate::error::{DashError, DashResult};
use crate::render::{ArcPrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one widget draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub arcs: Vec<ArcPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            arcs: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Frame with nothing to draw, used by widgets still waiting for inputs.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Viewport::new(0, 0))
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_arc(mut self, arc: ArcPrimitive) -> Self {
        self.arcs.push(arc);
        self
    }

    /// Appends `other` offset by `(dx, dy)`. The viewport is left untouched.
    pub fn append_translated(&mut self, other: &RenderFrame, dx: f64, dy: f64) {
        self.lines
            .extend(other.lines.iter().map(|line| line.translated(dx, dy)));
        self.rects
            .extend(other.rects.iter().map(|rect| rect.translated(dx, dy)));
        self.arcs
            .extend(other.arcs.iter().map(|arc| arc.translated(dx, dy)));
        self.texts
            .extend(other.texts.iter().map(|text| text.clone().translated(dx, dy)));
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        if !self.viewport.is_valid() {
            return Err(DashError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for arc in &self.arcs {
            arc.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.rects.is_empty()
            && self.arcs.is_empty()
            && self.texts.is_empty()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.rects.len() + self.arcs.len() + self.texts.len()
    }
}
