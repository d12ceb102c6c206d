//! Fixed pool of pre-generated background textures.
//!
//! The pool is filled exactly once; textures are immutable afterwards and
//! shared by every card. [`BackgroundCache::pick`] never hands out a pooled
//! raster directly: it copies one onto a fresh surface and stamps the week
//! label, so callers can draw over the result freely.

use kurbo::Point;

use crate::{
    error::{EmberdeckError, EmberdeckResult},
    surface::{Raster, Surface},
    text::TextEngine,
    texture,
    theme::Theme,
};

const WEEK_LABEL_SIZE: f32 = 25.0;

pub struct BackgroundCache {
    textures: Vec<Raster>,
    initialized: bool,
}

impl Default for BackgroundCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundCache {
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
            initialized: false,
        }
    }

    /// Generate the pool. Idempotent: a second call is a no-op.
    #[tracing::instrument(skip_all, fields(pool = theme.background_pool))]
    pub fn initialize<R: rand::Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        theme: &Theme,
    ) -> EmberdeckResult<()> {
        if self.initialized {
            return Ok(());
        }
        theme.validate()?;

        let mut textures = Vec::with_capacity(theme.background_pool);
        for _ in 0..theme.background_pool {
            textures.push(texture::generate(rng, theme)?);
        }
        self.textures = textures;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Read-only view of the pooled textures.
    pub fn textures(&self) -> &[Raster] {
        &self.textures
    }

    /// Copy a uniformly chosen texture onto a fresh surface and stamp the
    /// centered `week {label}` text. The pooled texture is never mutated.
    pub fn pick<R: rand::Rng + ?Sized>(
        &self,
        rng: &mut R,
        fonts: &mut TextEngine,
        theme: &Theme,
        week: &str,
    ) -> EmberdeckResult<Raster> {
        if !self.initialized || self.textures.is_empty() {
            return Err(EmberdeckError::render(
                "background cache must be initialized before pick",
            ));
        }

        let index = rng.gen_range(0..self.textures.len());
        let texture = &self.textures[index];

        let mut surface = Surface::new(theme.card.width, theme.card.height)?;
        let center = surface.center();
        surface.blit(texture, Point::ORIGIN);
        surface.text_centered(
            fonts,
            &format!("week {week}"),
            WEEK_LABEL_SIZE,
            theme.palette.paper,
            center,
        )?;
        Ok(surface.finish())
    }
}
