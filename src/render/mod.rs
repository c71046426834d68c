//! Device-loss-aware rendering context.
//!
//! [`RenderingContext`] owns the graphics device, swap chain, drawing target and
//! a fixed table of solid-color brushes. Callers bracket each frame with
//! [`begin_draw`](RenderingContext::begin_draw) / [`end_draw`](RenderingContext::end_draw)
//! and never have to handle device loss in their drawing code:
//!
//! - When the backend reports `DeviceRemoved`, `DeviceReset` or `RecreateTarget`,
//!   the whole device-dependent set is torn down and rebuilt before `end_draw`
//!   returns [`FrameStatus::RecreateNeeded`]. The caller just draws the next frame.
//! - Rebuilding is all-or-nothing, in the order device, swap chain, target,
//!   brushes. If any step fails, everything already created is dropped in reverse
//!   order and the next frame tries again.
//! - Draw calls while no valid device exists, outside a frame, or with a
//!   [`BrushHandle`] from before a rebuild do nothing.
//! - `ResourceExhausted` is sticky: every call reports [`FrameStatus::Fatal`] until
//!   [`reinitialize`](RenderingContext::reinitialize).
//!
//! ```text
//! initialize ──► Valid ──end_draw: device loss──► rebuild ──► Valid
//!                  │                                 │
//!                  └──── resource exhausted ─────────┴──► Failed ──reinitialize──► Valid
//! ```

mod backend;

pub use backend::{Color, GraphicsBackend, PointF, RectF, SurfaceSize};

use crate::config::RenderConfig;
use crate::error::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// The fixed brush table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolidColor {
    Black,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Gray,
    White,
}

impl SolidColor {
    pub const ALL: [SolidColor; 8] = [
        SolidColor::Black,
        SolidColor::Red,
        SolidColor::Orange,
        SolidColor::Yellow,
        SolidColor::Green,
        SolidColor::Blue,
        SolidColor::Gray,
        SolidColor::White,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `0xRRGGBB`.
    pub fn rgb(self) -> u32 {
        match self {
            SolidColor::Black => 0x000000,
            SolidColor::Red => 0xFF0000,
            SolidColor::Orange => 0xFB9151,
            SolidColor::Yellow => 0xFFFF00,
            SolidColor::Green => 0x008000,
            SolidColor::Blue => 0x0000FF,
            SolidColor::Gray => 0x808080,
            SolidColor::White => 0xFFFFFF,
        }
    }

    pub fn color(self) -> Color {
        Color::from_rgb(self.rgb())
    }
}

/// Reference to a brush in the table, valid only until the next rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BrushHandle {
    color: SolidColor,
    generation: u64,
}

impl BrushHandle {
    pub fn color(&self) -> SolidColor {
        self.color
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of a frame-level call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Ok,
    /// Device-dependent resources were (or must be) rebuilt; draw the next frame normally.
    RecreateNeeded,
    /// This call failed; the context is still usable. See [`RenderingContext::last_error`].
    Failed(ErrorKind),
    /// Sticky failure. Nothing works until [`RenderingContext::reinitialize`].
    Fatal(ErrorKind),
}

struct SurfaceResources<B: GraphicsBackend> {
    // Dropped before the target they were created from.
    brushes: Vec<B::Brush>,
    target: B::Target,
}

struct DeviceResources<B: GraphicsBackend> {
    // Field order is release order.
    surface: Option<SurfaceResources<B>>,
    swap_chain: B::SwapChain,
    device: B::Device,
}

pub struct RenderingContext<B: GraphicsBackend> {
    resources: Option<DeviceResources<B>>,
    factory: Option<B::Factory>,
    backend: B,
    config: RenderConfig,
    size: SurfaceSize,
    dpi: f32,
    generation: u64,
    recreations: u64,
    in_frame: bool,
    pending_resize: bool,
    surface_stale: bool,
    refreshed: bool,
    deferred: Option<Error>,
    failure: Option<Error>,
    last_error: Option<Error>,
}

impl<B: GraphicsBackend> RenderingContext<B> {
    pub fn new(backend: B, config: RenderConfig) -> Self {
        Self {
            resources: None,
            factory: None,
            backend,
            config,
            size: SurfaceSize::default(),
            dpi: 96.0,
            generation: 0,
            recreations: 0,
            in_frame: false,
            pending_resize: false,
            surface_stale: false,
            refreshed: false,
            deferred: None,
            failure: None,
            last_error: None,
        }
    }

    /// Create the factory (first call only) and the device-dependent set.
    pub fn initialize(&mut self, size: SurfaceSize, dpi: f32) -> Result<()> {
        if let Some(e) = &self.failure {
            return Err(e.duplicate());
        }
        check_size(size)?;
        check_dpi(dpi)?;
        self.size = size;
        self.dpi = dpi;

        if self.factory.is_none() {
            let factory = self.backend.create_factory().map_err(|e| self.absorb(e))?;
            self.factory = Some(factory);
            debug!("graphics factory created");
        }
        self.in_frame = false;
        self.resources = None;
        self.create_device_resources().map_err(|e| self.absorb(e))
    }

    /// Clear a sticky failure and start over. The factory is kept.
    pub fn reinitialize(&mut self, size: SurfaceSize, dpi: f32) -> Result<()> {
        if self.failure.take().is_some() {
            info!("reinitializing after failure");
        }
        self.deferred = None;
        self.last_error = None;
        self.initialize(size, dpi)
    }

    pub fn begin_draw(&mut self) -> FrameStatus {
        if let Some(e) = &self.failure {
            return FrameStatus::Fatal(e.kind());
        }
        if self.in_frame {
            return self.reject("begin_draw called while a frame is open");
        }
        if self.factory.is_none() {
            return self.reject("rendering context is not initialized");
        }
        if self.resources.is_none() {
            if let Err(e) = self.create_device_resources() {
                return self.creation_error(e);
            }
        }

        let surface_missing = self
            .resources
            .as_ref()
            .map_or(false, |r| r.surface.is_none());
        if self.pending_resize || self.surface_stale || surface_missing {
            if let Err(e) = self.rebuild_surface() {
                if e.is_device_loss() || e.kind() == ErrorKind::Exhausted {
                    return self.recover(e);
                }
                warn!(error = %e, "surface rebuild failed, reporting at end of frame");
                self.deferred = Some(e);
            }
        }

        if let Some(DeviceResources {
            surface: Some(surface),
            ..
        }) = self.resources.as_mut()
        {
            self.backend.begin_draw(&mut surface.target);
        }
        self.in_frame = true;
        FrameStatus::Ok
    }

    /// Finish the frame and present it.
    ///
    /// Without an open frame this is a contract error, except while device
    /// resources are missing after a failed rebuild: then the call retries the
    /// creation, so a host that skipped drawing still recovers.
    pub fn end_draw(&mut self) -> FrameStatus {
        if let Some(e) = &self.failure {
            return FrameStatus::Fatal(e.kind());
        }
        if !self.in_frame {
            if self.factory.is_none() || self.resources.is_some() {
                return self.reject("end_draw called without an open frame");
            }
            if let Err(e) = self.create_device_resources() {
                return self.creation_error(e);
            }
            return FrameStatus::Ok;
        }
        self.in_frame = false;

        let presented = match self.resources.as_mut() {
            Some(DeviceResources {
                surface: Some(surface),
                swap_chain,
                ..
            }) => self
                .backend
                .end_draw(&mut surface.target)
                .and_then(|()| self.backend.present(swap_chain)),
            _ => Ok(()),
        };
        let outcome = presented.and_then(|()| match self.deferred.take() {
            Some(e) => Err(e),
            None => Ok(()),
        });

        match outcome {
            Ok(()) => FrameStatus::Ok,
            Err(e) => self.recover(e),
        }
    }

    /// Record a new surface size. Buffers are resized at the next `begin_draw`;
    /// a failure there is reported by the following `end_draw`.
    pub fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        if let Some(e) = &self.failure {
            return Err(e.duplicate());
        }
        check_size(size)?;
        if size != self.size {
            debug!(width = size.width, height = size.height, "surface resize requested");
            self.size = size;
            self.pending_resize = true;
        }
        Ok(())
    }

    /// Change the target DPI. Unchanged DPI is a no-op.
    pub fn set_dpi(&mut self, dpi: f32) -> Result<()> {
        if let Some(e) = &self.failure {
            return Err(e.duplicate());
        }
        check_dpi(dpi)?;
        if dpi != self.dpi {
            debug!(dpi, "dpi changed");
            self.dpi = dpi;
            self.surface_stale = true;
        }
        Ok(())
    }

    /// Tear down and rebuild the whole device-dependent set.
    pub fn handle_device_lost(&mut self) -> Result<()> {
        if let Some(e) = &self.failure {
            return Err(e.duplicate());
        }
        if self.factory.is_none() {
            return Err(not_initialized());
        }
        self.recreations += 1;
        info!(recreations = self.recreations, "rebuilding device resources");
        self.in_frame = false;
        self.deferred = None;
        self.resources = None;
        self.create_device_resources().map_err(|e| self.absorb(e))
    }

    /// Ask the backend whether the device is still current and rebuild if not.
    pub fn validate_device(&mut self) -> FrameStatus {
        if let Some(e) = &self.failure {
            return FrameStatus::Fatal(e.kind());
        }
        let checked = match (&self.factory, &self.resources) {
            (Some(factory), Some(res)) => self.backend.check_device(factory, &res.device),
            _ => return FrameStatus::Ok,
        };
        match checked {
            Ok(()) => FrameStatus::Ok,
            Err(e) => self.recover(e),
        }
    }

    pub fn trim(&mut self) {
        if let Some(res) = &self.resources {
            self.backend.trim(&res.device);
            debug!("graphics memory trimmed");
        }
    }

    /// Handle for `color`, or `None` while no valid device exists.
    pub fn brush(&self, color: SolidColor) -> Option<BrushHandle> {
        self.is_valid().then_some(BrushHandle {
            color,
            generation: self.generation,
        })
    }

    pub fn clear(&mut self, color: SolidColor) {
        if !self.in_frame {
            return;
        }
        if let Some(DeviceResources {
            surface: Some(surface),
            ..
        }) = self.resources.as_mut()
        {
            self.backend.clear(&mut surface.target, color.color());
        }
    }

    pub fn fill_rectangle(&mut self, rect: RectF, brush: BrushHandle) {
        self.with_brush(brush, |backend, target, b| {
            backend.fill_rectangle(target, rect, b)
        });
    }

    pub fn draw_rectangle(&mut self, rect: RectF, stroke_width: f32, brush: BrushHandle) {
        self.with_brush(brush, |backend, target, b| {
            backend.draw_rectangle(target, rect, stroke_width, b)
        });
    }

    pub fn draw_line(&mut self, from: PointF, to: PointF, stroke_width: f32, brush: BrushHandle) {
        self.with_brush(brush, |backend, target, b| {
            backend.draw_line(target, from, to, stroke_width, b)
        });
    }

    /// `true` once after every rebuild; device-bound bitmaps must be recreated then.
    pub fn take_resources_refreshed(&mut self) -> bool {
        std::mem::take(&mut self.refreshed)
    }

    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
            && self
                .resources
                .as_ref()
                .map_or(false, |r| r.surface.is_some())
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Bumped on every successful (re)build of the target and brushes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of full device rebuilds performed by [`handle_device_lost`](Self::handle_device_lost).
    pub fn recreations(&self) -> u64 {
        self.recreations
    }

    /// Error behind the most recent `Failed`, `RecreateNeeded` or `Fatal` status.
    pub fn last_error(&self) -> Option<&Error> {
        self.failure.as_ref().or(self.last_error.as_ref())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn create_device_resources(&mut self) -> Result<()> {
        let factory = self.factory.as_ref().ok_or_else(not_initialized)?;
        let device = self.backend.create_device(factory)?;
        let swap_chain = self
            .backend
            .create_swap_chain(&device, self.size, &self.config)?;
        let surface = build_surface(&mut self.backend, &device, &swap_chain, self.dpi)?;
        self.resources = Some(DeviceResources {
            surface: Some(surface),
            swap_chain,
            device,
        });
        self.pending_resize = false;
        self.surface_stale = false;
        self.mark_refreshed();
        debug!(
            generation = self.generation,
            width = self.size.width,
            height = self.size.height,
            "device resources created"
        );
        Ok(())
    }

    /// Rebuild the size/DPI dependent part, resizing the swap chain first if needed.
    fn rebuild_surface(&mut self) -> Result<()> {
        let Some(res) = self.resources.as_mut() else {
            return Ok(());
        };
        res.surface = None;
        if self.pending_resize {
            self.backend
                .resize_swap_chain(&res.device, &mut res.swap_chain, self.size)?;
            self.pending_resize = false;
        }
        match build_surface(&mut self.backend, &res.device, &res.swap_chain, self.dpi) {
            Ok(surface) => res.surface = Some(surface),
            Err(e) => {
                self.resources = None;
                return Err(e);
            }
        }
        self.surface_stale = false;
        self.mark_refreshed();
        debug!(generation = self.generation, "surface resources rebuilt");
        Ok(())
    }

    fn with_brush(
        &mut self,
        handle: BrushHandle,
        draw: impl FnOnce(&mut B, &mut B::Target, &B::Brush),
    ) {
        if !self.in_frame || handle.generation != self.generation {
            return;
        }
        let Some(DeviceResources {
            surface: Some(surface),
            ..
        }) = self.resources.as_mut()
        else {
            return;
        };
        if let Some(brush) = surface.brushes.get(handle.color.index()) {
            draw(&mut self.backend, &mut surface.target, brush);
        }
    }

    fn mark_refreshed(&mut self) {
        self.generation += 1;
        self.refreshed = true;
    }

    /// Make `ResourceExhausted` sticky.
    fn absorb(&mut self, e: Error) -> Error {
        if e.kind() == ErrorKind::Exhausted && self.failure.is_none() {
            error!(error = %e, "rendering context failed");
            self.in_frame = false;
            self.resources = None;
            self.failure = Some(e.duplicate());
        }
        e
    }

    fn creation_error(&mut self, e: Error) -> FrameStatus {
        let e = self.absorb(e);
        if self.failure.is_some() {
            return FrameStatus::Fatal(e.kind());
        }
        warn!(error = %e, "device resource creation failed, retrying next frame");
        let status = if e.is_device_loss() {
            FrameStatus::RecreateNeeded
        } else {
            FrameStatus::Failed(e.kind())
        };
        self.last_error = Some(e);
        status
    }

    /// Classify a failure from a frame-level call, rebuilding on device loss.
    fn recover(&mut self, e: Error) -> FrameStatus {
        if e.is_device_loss() {
            info!(error = %e, "device lost");
            self.last_error = Some(e);
            return match self.handle_device_lost() {
                Ok(()) => FrameStatus::RecreateNeeded,
                Err(err) => self.creation_error(err),
            };
        }
        let e = self.absorb(e);
        if self.failure.is_some() {
            return FrameStatus::Fatal(e.kind());
        }
        let status = FrameStatus::Failed(e.kind());
        self.last_error = Some(e);
        status
    }

    fn reject(&mut self, msg: &str) -> FrameStatus {
        self.last_error = Some(Error::InvalidArgument(msg.to_string()));
        FrameStatus::Failed(ErrorKind::Contract)
    }
}

fn build_surface<B: GraphicsBackend>(
    backend: &mut B,
    device: &B::Device,
    swap_chain: &B::SwapChain,
    dpi: f32,
) -> Result<SurfaceResources<B>> {
    let target = backend.create_target(device, swap_chain, dpi)?;
    let brushes = SolidColor::ALL
        .iter()
        .map(|c| backend.create_brush(&target, c.color()))
        .collect::<Result<Vec<_>>>()?;
    Ok(SurfaceResources { brushes, target })
}

fn check_size(size: SurfaceSize) -> Result<()> {
    if size.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "surface size must be non-zero, got {}x{}",
            size.width, size.height
        )));
    }
    Ok(())
}

fn check_dpi(dpi: f32) -> Result<()> {
    if !(dpi.is_finite() && dpi > 0.0) {
        return Err(Error::InvalidArgument(format!("invalid dpi {dpi}")));
    }
    Ok(())
}

fn not_initialized() -> Error {
    Error::InvalidArgument("rendering context is not initialized".to_string())
}
