/// 2D drawing operations for an overlay canvas
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill entire canvas with color (r, g, b, a), straight alpha
    Clear(u8, u8, u8, u8),

    /// Filled anti-aliased circle with a linear glow halo `blur` pixels wide.
    /// `opacity` scales both the disc and the halo.
    GlowCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: [u8; 3],
        opacity: f32,
        blur: f32,
    },
}

/// Peak halo alpha relative to the disc
const GLOW_STRENGTH: f32 = 0.5;

/// Canvas state - premultiplied RGBA pixel buffer
#[derive(Clone)]
pub struct Canvas {
    pixels: Vec<[u8; 4]>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![[0; 4]; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Execute operations in order directly on the buffer
    pub fn apply(&mut self, ops: &[DrawOp]) {
        for op in ops {
            self.execute_op(op);
        }
    }

    fn execute_op(&mut self, op: &DrawOp) {
        match *op {
            DrawOp::Clear(r, g, b, a) => self.clear(r, g, b, a),
            DrawOp::GlowCircle {
                x,
                y,
                radius,
                color,
                opacity,
                blur,
            } => self.draw_glow_circle(x, y, radius, color, opacity, blur),
        }
    }

    /// Clear canvas to color
    fn clear(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let pixel = premultiply([r, g, b], a as f32 / 255.0);
        self.pixels.fill(pixel);
    }

    fn draw_glow_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        color: [u8; 3],
        opacity: f32,
        blur: f32,
    ) {
        let opacity = opacity.clamp(0.0, 1.0);
        let blur = blur.max(0.0);
        if radius <= 0.0 || opacity <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }

        let reach = radius + blur + 1.0;
        let x0 = (cx - reach).floor().max(0.0) as i64;
        let y0 = (cy - reach).floor().max(0.0) as i64;
        let x1 = ((cx + reach).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((cy + reach).ceil() as i64).min(self.height as i64 - 1);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();

                let coverage = shade(d, radius, blur) * opacity;
                if coverage > 0.0 {
                    let idx = py as usize * self.width as usize + px as usize;
                    self.pixels[idx] = blend_over(premultiply(color, coverage), self.pixels[idx]);
                }
            }
        }
    }

    /// Premultiplied RGBA rows
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Raw bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Premultiplied pixel at (x, y), `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Get canvas dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reallocate to a new size, contents cleared
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }
}

/// Alpha at distance `d` from a disc of `radius` with a halo of width `blur`
fn shade(d: f32, radius: f32, blur: f32) -> f32 {
    // One pixel of anti-aliasing across the rim
    let disc = (radius + 0.5 - d).clamp(0.0, 1.0);
    let halo = if blur > 0.0 && d > radius {
        (1.0 - (d - radius) / blur).clamp(0.0, 1.0) * GLOW_STRENGTH
    } else {
        0.0
    };
    disc.max(halo)
}

fn premultiply(rgb: [u8; 3], alpha: f32) -> [u8; 4] {
    let a = alpha.clamp(0.0, 1.0);
    [
        (rgb[0] as f32 * a).round() as u8,
        (rgb[1] as f32 * a).round() as u8,
        (rgb[2] as f32 * a).round() as u8,
        (a * 255.0).round() as u8,
    ]
}

/// Porter-Duff source-over on premultiplied pixels
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let keep = 1.0 - src[3] as f32 / 255.0;
    std::array::from_fn(|i| (src[i] as f32 + dst[i] as f32 * keep).round().min(255.0) as u8)
}
