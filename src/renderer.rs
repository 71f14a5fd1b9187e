// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::rngs::StdRng;

use crate::field::ParticleField;
use crate::runtime::Ticker;
use crate::surface::Surface;

pub const DEFAULT_FPS: f64 = 60.0;

enum Lifecycle {
    Mounted { field: ParticleField },
    Unmounted,
}

/// A mounted particle field bound to the surface it paints on.
///
/// The handle owns everything the animation touches. `unmount` stops the
/// frame ticker and drops the pool; after that frames and resizes are
/// ignored.
pub struct RenderHandle<S: Surface> {
    surface: S,
    state: Lifecycle,
    ticker: Ticker,
    rng: StdRng,
    frames: u64,
}

/// Sizes `surface` to the viewport, seeds the pool and starts the frame
/// loop. A missing surface means there is nothing to decorate: no setup
/// happens and `None` comes back.
pub fn mount<S: Surface>(
    surface: Option<S>,
    width: u32,
    height: u32,
    mut rng: StdRng,
) -> Option<RenderHandle<S>> {
    let Some(mut surface) = surface else {
        debug!("no drawable surface, particle field stays off");
        return None;
    };

    surface.resize(width, height);
    let field = ParticleField::seed(width, height, &mut rng);

    let mut ticker = Ticker::new(DEFAULT_FPS);
    ticker.start(Instant::now());

    info!(
        "particle field mounted: {}x{} px, {} particles",
        width,
        height,
        field.len()
    );

    Some(RenderHandle {
        surface,
        state: Lifecycle::Mounted { field },
        ticker,
        rng,
        frames: 0,
    })
}

impl<S: Surface> RenderHandle<S> {
    pub fn set_frame_rate(&mut self, fps: f64) {
        self.ticker.set_fps(fps);
        debug!("frame period set to {:?}", self.ticker.period());
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state, Lifecycle::Mounted { .. })
    }

    #[cfg(test)]
    pub fn field(&self) -> Option<&ParticleField> {
        match &self.state {
            Lifecycle::Mounted { field, .. } => Some(field),
            Lifecycle::Unmounted => None,
        }
    }

    #[cfg(test)]
    pub fn field_mut(&mut self) -> Option<&mut ParticleField> {
        match &mut self.state {
            Lifecycle::Mounted { field, .. } => Some(field),
            Lifecycle::Unmounted => None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[cfg(test)]
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    #[cfg(test)]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.deadline()
    }

    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.ticker.timeout(now)
    }

    /// Runs one frame right away. Returns false once unmounted.
    pub fn on_frame(&mut self) -> bool {
        let Lifecycle::Mounted { field, .. } = &mut self.state else {
            return false;
        };
        let respawned = field.frame(&mut self.surface, &mut self.rng);
        self.frames = self.frames.wrapping_add(1);
        if respawned > 0 {
            trace!("frame {}: {} particles respawned", self.frames, respawned);
        }
        true
    }

    /// Runs a frame if one is due at `now` and books the next one.
    pub fn pump(&mut self, now: Instant) -> bool {
        if !self.ticker.due(now) {
            return false;
        }
        let drew = self.on_frame();
        self.ticker.advance(now);
        drew
    }

    /// Viewport changed. Only the surface follows; particles keep their
    /// coordinates and drift back into range on their own.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if !self.is_mounted() {
            return;
        }
        debug!("surface resized to {}x{} px", width, height);
        self.surface.resize(width, height);
    }

    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.ticker.stop();
        self.state = Lifecycle::Unmounted;
        info!("particle field unmounted after {} frames", self.frames);
    }
}
