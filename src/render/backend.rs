//! Graphics backend abstraction.
//!
//! [`GraphicsBackend`] is the seam between [`RenderingContext`](super::RenderingContext)
//! and a concrete platform API (Direct3D 11 + Direct2D, an HWND render target,
//! a test double, ...). The context never looks inside the associated types; it
//! only creates them in the documented order, hands them back to the backend,
//! and drops them when they become invalid.
//!
//! ## Error contract
//! Backends report failures as [`Error`](crate::error::Error) values:
//! - `DeviceRemoved` / `DeviceReset` / `RecreateTarget` mean the device-dependent
//!   set must be rebuilt.
//! - `ResourceExhausted` makes the context fail permanently until reinitialized.
//! - anything else is reported to the caller for that frame only.

use crate::config::RenderConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Pixel size of the presentation surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Straight RGBA, each channel `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque color from a `0xRRGGBB` value.
    pub fn from_rgb(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
            a: 1.0,
        }
    }
}

/// Platform graphics API as seen by the rendering context.
///
/// Creation order is always factory, device, swap chain, target, brushes.
/// Everything below the factory is rebuilt as a unit after device loss.
pub trait GraphicsBackend {
    /// Device-independent objects; created once and kept for the process lifetime.
    type Factory;
    type Device;
    type SwapChain;
    /// Drawing target bound to the swap chain's back buffer.
    type Target;
    type Brush;

    fn create_factory(&mut self) -> Result<Self::Factory>;

    fn create_device(&mut self, factory: &Self::Factory) -> Result<Self::Device>;

    fn create_swap_chain(
        &mut self,
        device: &Self::Device,
        size: SurfaceSize,
        config: &RenderConfig,
    ) -> Result<Self::SwapChain>;

    /// Resize the swap chain buffers. Called only while no target exists.
    fn resize_swap_chain(
        &mut self,
        device: &Self::Device,
        swap_chain: &mut Self::SwapChain,
        size: SurfaceSize,
    ) -> Result<()>;

    fn create_target(
        &mut self,
        device: &Self::Device,
        swap_chain: &Self::SwapChain,
        dpi: f32,
    ) -> Result<Self::Target>;

    fn create_brush(&mut self, target: &Self::Target, color: Color) -> Result<Self::Brush>;

    /// `Ok` while `device` is still the one the platform would hand out today.
    fn check_device(&mut self, factory: &Self::Factory, device: &Self::Device) -> Result<()>;

    fn begin_draw(&mut self, target: &mut Self::Target);

    fn end_draw(&mut self, target: &mut Self::Target) -> Result<()>;

    fn present(&mut self, swap_chain: &mut Self::SwapChain) -> Result<()>;

    /// Release transient driver memory without destroying anything.
    fn trim(&mut self, device: &Self::Device);

    fn clear(&mut self, target: &mut Self::Target, color: Color);

    fn fill_rectangle(&mut self, target: &mut Self::Target, rect: RectF, brush: &Self::Brush);

    fn draw_rectangle(
        &mut self,
        target: &mut Self::Target,
        rect: RectF,
        stroke_width: f32,
        brush: &Self::Brush,
    );

    fn draw_line(
        &mut self,
        target: &mut Self::Target,
        from: PointF,
        to: PointF,
        stroke_width: f32,
        brush: &Self::Brush,
    );
}
