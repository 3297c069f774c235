//! DPI 缩放来源
//!
//! 从窗口的设备坐标变换读取 X/Y 缩放比例，初始化之前比例为 1.0（不缩放）。
use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use crate::config::STANDARD_DPI;
use crate::host::WindowMetrics;
use crate::types::Thickness;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DpiState {
    pub dpi_scale_x: f64,
    pub dpi_scale_y: f64,
}

impl Default for DpiState {
    fn default() -> Self {
        Self {
            dpi_scale_x: 1.0,
            dpi_scale_y: 1.0,
        }
    }
}

impl DpiState {
    /// 实际 DPI（96 = 100%）
    pub fn dpi(&self) -> (u32, u32) {
        (
            (self.dpi_scale_x * STANDARD_DPI) as u32,
            (self.dpi_scale_y * STANDARD_DPI) as u32,
        )
    }

    /// 缩放百分比，四舍五入
    pub fn percent(&self) -> (u32, u32) {
        (
            (self.dpi_scale_x * 100.0).round() as u32,
            (self.dpi_scale_y * 100.0).round() as u32,
        )
    }
}

/// 单窗口的 DPI 状态句柄，克隆后共享同一份状态
#[derive(Debug, Clone, Default)]
pub struct DpiSource {
    state: Rc<Cell<DpiState>>,
}

impl DpiSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取窗口当前的设备坐标变换
    pub fn initialize(&self, window: &dyn WindowMetrics) {
        match window.device_transform() {
            Some(transform) => {
                let state = DpiState {
                    dpi_scale_x: transform.m11,
                    dpi_scale_y: transform.m22,
                };
                tracing::debug!(
                    "DPI 缩放: {:.2} x {:.2}",
                    state.dpi_scale_x,
                    state.dpi_scale_y
                );
                self.state.set(state);
            }
            // 没有显示目标时保留之前的值
            None => tracing::debug!("窗口没有设备坐标变换，保留原 DPI 缩放"),
        }
    }

    pub fn state(&self) -> DpiState {
        self.state.get()
    }

    pub fn scale_x(&self) -> f64 {
        self.state.get().dpi_scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.state.get().dpi_scale_y
    }

    /// 将设计时尺寸转换为实际显示尺寸
    pub fn scale(&self, design_value: f64) -> f64 {
        design_value * self.scale_x()
    }

    pub fn scale_thickness(&self, top: f64, right: f64, bottom: f64, left: f64) -> Thickness {
        Thickness::new(left, top, right, bottom).map(|v| self.scale(v))
    }
}
