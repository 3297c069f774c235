//! Win32 原生窗口适配
//!
//! 供自己创建 `HWND` 的宿主（不经 egui）使用，演示程序走的是 egui 视口。
//! 把 `HWND` 包装成 [`HostWindow`]。宿主在窗口过程里收到 `WM_SIZE` 或
//! `WM_DPICHANGED` 后调用 [`NativeWindow::dispatch_resized`]：
//!
//! ```ignore
//! let window = NativeWindow::new(hwnd);
//! let scale = ScaleContext::new();
//! scale.initialize(&window);
//! // 窗口过程
//! WM_SIZE | WM_DPICHANGED => window.dispatch_resized(),
//! ```
//!
//! 窗口还没有客户区时尺寸为 0，缩放计算会回退到系统工作区。
use std::ffi::c_void;

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    GetClientRect, SystemParametersInfoW, SPI_GETWORKAREA, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
};

use crate::config::STANDARD_DPI;
use crate::host::{HostWindow, ResizeEvent, ResizeHandler, WindowMetrics};
use crate::types::{DeviceTransform, Size};

pub struct NativeWindow {
    hwnd: HWND,
    resized: ResizeEvent,
}

impl NativeWindow {
    pub fn new(hwnd: HWND) -> Self {
        Self {
            hwnd,
            resized: ResizeEvent::new(),
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn dispatch_resized(&self) {
        self.resized.dispatch(self);
    }

    /// 物理像素 -> 逻辑单位
    fn dpi_scale(&self) -> f64 {
        self.device_transform().map(|t| t.m11).unwrap_or(1.0)
    }
}

fn rect_size(rect: &RECT) -> Size {
    Size::new(
        (rect.right - rect.left) as f64,
        (rect.bottom - rect.top) as f64,
    )
}

impl WindowMetrics for NativeWindow {
    fn actual_size(&self) -> Size {
        let mut rect = RECT::default();
        match unsafe { GetClientRect(self.hwnd, &mut rect) } {
            Ok(()) => {
                let scale = self.dpi_scale();
                let size = rect_size(&rect);
                Size::new(size.width / scale, size.height / scale)
            }
            Err(e) => {
                tracing::debug!("GetClientRect 失败: {:?}", e);
                Size::default()
            }
        }
    }

    fn work_area(&self) -> Size {
        let mut rect = RECT::default();
        let result = unsafe {
            SystemParametersInfoW(
                SPI_GETWORKAREA,
                0,
                Some(&mut rect as *mut RECT as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        };
        if let Err(e) = result {
            tracing::warn!("读取工作区失败: {:?}", e);
            return Size::default();
        }
        let scale = self.dpi_scale();
        let size = rect_size(&rect);
        Size::new(size.width / scale, size.height / scale)
    }

    fn device_transform(&self) -> Option<DeviceTransform> {
        // 窗口句柄无效时返回 0
        let dpi = unsafe { GetDpiForWindow(self.hwnd) };
        if dpi == 0 {
            return None;
        }
        let scale = dpi as f64 / STANDARD_DPI;
        Some(DeviceTransform::new(scale, scale))
    }
}

impl HostWindow for NativeWindow {
    fn subscribe_resized(&self, handler: ResizeHandler) {
        self.resized.subscribe(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleContext;

    #[test]
    fn invalid_handle_falls_back_to_work_area() {
        let window = NativeWindow::new(HWND::default());
        assert!(window.device_transform().is_none());
        assert!(window.actual_size().is_empty());

        let ctx = ScaleContext::new();
        ctx.initialize(&window);
        assert_eq!(ctx.window_size(), window.work_area());
    }

    #[test]
    fn dispatch_resized_reaches_scale_context() {
        use std::cell::Cell;
        use std::rc::Rc;

        let window = NativeWindow::new(HWND::default());
        let ctx = ScaleContext::new();
        ctx.initialize(&window);

        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = ctx.subscribe(move || h.set(h.get() + 1));

        window.dispatch_resized();
        window.dispatch_resized();
        assert_eq!(hits.get(), 2);
    }
}
