//! 宿主窗口抽象
//!
//! 缩放核心只依赖宿主窗口的四项能力：实际尺寸、工作区尺寸、设备坐标变换以及尺寸变化通知。

use std::cell::RefCell;

use crate::types::{DeviceTransform, Size};

/// 窗口度量信息
pub trait WindowMetrics {
    /// 窗口实际尺寸（逻辑单位），尚未布局时可能为 0
    fn actual_size(&self) -> Size;

    /// 系统工作区尺寸，窗口尺寸为 0 时作为回退
    fn work_area(&self) -> Size;

    /// 设备坐标变换；窗口尚未挂到显示目标上时返回 None
    fn device_transform(&self) -> Option<DeviceTransform>;
}

pub type ResizeHandler = Box<dyn FnMut(&dyn WindowMetrics)>;

pub trait HostWindow: WindowMetrics {
    /// 注册一个持久的尺寸变化监听
    fn subscribe_resized(&self, handler: ResizeHandler);
}

/// 宿主实现 `HostWindow` 时可复用的尺寸变化事件
#[derive(Default)]
pub struct ResizeEvent {
    handlers: RefCell<Vec<ResizeHandler>>,
}

impl ResizeEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: ResizeHandler) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按注册顺序同步调用所有监听
    pub fn dispatch(&self, window: &dyn WindowMetrics) {
        // 先取出再调用，回调里再注册新监听不会重复借用
        let mut running = std::mem::take(&mut *self.handlers.borrow_mut());
        for handler in running.iter_mut() {
            handler(window);
        }
        let mut handlers = self.handlers.borrow_mut();
        running.append(&mut handlers);
        *handlers = running;
    }
}
