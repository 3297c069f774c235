//! DPI 感知与窗口等比缩放
//!
//! 根据窗口实际尺寸和系统 DPI，把设计时的宽高、边距、圆角、字号换算成实际显示值，
//! 并在窗口缩放或跨显示器移动时实时更新。

pub mod awareness;
pub mod behavior;
pub mod config;
pub mod convert;
pub mod dpi;
pub mod error;
pub mod host;
pub mod params;
#[cfg(windows)]
pub mod platform;
pub mod scale;
pub mod types;

pub use awareness::DpiAwareness;
pub use config::{DesignBaseline, ResolutionPreset};
pub use dpi::{DpiSource, DpiState};
pub use error::{ParamError, ScaleError, ScaleResult};
pub use host::{HostWindow, WindowMetrics};
pub use scale::{ScaleContext, ScaleState, Subscription};
pub use types::*;
