//! 窗口比例缩放与缩放注册表
//!
//! 以窗口实际尺寸与设计基准尺寸之比计算缩放系数。X/Y 两个方向取较小值，
//! 保证内容不超出窗口。缩放系数变化时同步通知所有订阅者。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::config::{DesignBaseline, ResolutionPreset};
use crate::host::{HostWindow, WindowMetrics};
use crate::types::{CornerRadius, Size, Thickness};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleState {
    pub scale_x: f64,
    pub scale_y: f64,
    /// min(scale_x, scale_y)
    pub uniform_scale: f64,
    pub initialized: bool,
}

impl Default for ScaleState {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            uniform_scale: 1.0,
            initialized: false,
        }
    }
}

/// 窗口尚未布局（宽高为 0）时回退到系统工作区尺寸
pub fn effective_size(window: &dyn WindowMetrics) -> Size {
    let actual = window.actual_size();
    if actual.is_empty() {
        window.work_area()
    } else {
        actual
    }
}

pub fn compute_scale(actual: Size, baseline: &DesignBaseline) -> ScaleState {
    let scale_x = actual.width / baseline.width;
    let scale_y = actual.height / baseline.height;
    ScaleState {
        scale_x,
        scale_y,
        uniform_scale: scale_x.min(scale_y),
        initialized: true,
    }
}

pub fn recompute_scale(window: &dyn WindowMetrics, baseline: &DesignBaseline) -> ScaleState {
    compute_scale(effective_size(window), baseline)
}

struct Listener {
    id: u64,
    callback: Rc<dyn Fn()>,
}

#[derive(Default)]
struct Inner {
    baseline: Cell<DesignBaseline>,
    state: Cell<ScaleState>,
    window_size: Cell<Size>,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

impl Inner {
    fn remove_listener(&self, id: u64) -> bool {
        let removed = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter()
                .position(|l| l.id == id)
                .map(|pos| listeners.remove(pos))
        };
        // 回调里可能持有同一注册表的其他订阅，必须在释放借用后再析构
        removed.is_some()
    }

    fn is_registered(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|l| l.id == id)
    }
}

/// 缩放注册表句柄
///
/// 克隆得到的句柄共享同一份基准、缩放状态与订阅列表。只能在 UI 线程使用。
#[derive(Clone, Default)]
pub struct ScaleContext {
    inner: Rc<Inner>,
}

impl fmt::Debug for ScaleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaleContext")
            .field("baseline", &self.baseline())
            .field("state", &self.state())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ScaleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline(baseline: DesignBaseline) -> Self {
        let ctx = Self::new();
        if baseline.is_valid() {
            ctx.inner.baseline.set(baseline);
        }
        ctx
    }

    pub fn baseline(&self) -> DesignBaseline {
        self.inner.baseline.get()
    }

    pub fn state(&self) -> ScaleState {
        self.inner.state.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.state.get().initialized
    }

    pub fn scale_x(&self) -> f64 {
        self.inner.state.get().scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.inner.state.get().scale_y
    }

    pub fn uniform_scale(&self) -> f64 {
        self.inner.state.get().uniform_scale
    }

    /// 最近一次测得的窗口尺寸（已套用工作区回退）
    pub fn window_size(&self) -> Size {
        self.inner.window_size.get()
    }

    /// 自定义设计基准
    ///
    /// 三个值必须都 > 0 且至少一个与当前不同才会生效；已初始化时触发一次变化通知。
    pub fn configure_baseline(&self, width: f64, height: f64, dpi_scale: f64) -> bool {
        let Some(baseline) = DesignBaseline::new(width, height, dpi_scale) else {
            tracing::debug!("忽略无效的设计基准: {}x{} @ {}", width, height, dpi_scale);
            return false;
        };
        self.set_baseline(baseline)
    }

    pub fn set_baseline(&self, baseline: DesignBaseline) -> bool {
        if !baseline.is_valid() || baseline == self.baseline() {
            return false;
        }
        self.inner.baseline.set(baseline);
        tracing::info!(
            "设计基准: {}x{} @ {}%",
            baseline.width,
            baseline.height,
            (baseline.dpi_scale * 100.0).round()
        );
        if self.is_initialized() {
            self.inner
                .state
                .set(compute_scale(self.window_size(), &baseline));
            self.fire_scale_changed();
        }
        true
    }

    pub fn apply_preset(&self, preset: ResolutionPreset) -> bool {
        tracing::debug!("切换到 {} 基准", preset.label());
        self.set_baseline(preset.baseline())
    }

    /// 在窗口加载完成后调用
    ///
    /// 完成首次计算并通知订阅者，随后在窗口每次尺寸变化时重新计算。
    /// 重复调用只会重新计算，不会重复注册尺寸监听。
    pub fn initialize<W: HostWindow>(&self, window: &W) {
        let first = !self.is_initialized();
        self.measure(window);
        tracing::info!(
            "缩放初始化: 窗口 {}x{}, 缩放 {:.3}",
            self.window_size().width,
            self.window_size().height,
            self.uniform_scale()
        );
        self.fire_scale_changed();

        if first {
            let weak = self.downgrade();
            window.subscribe_resized(Box::new(move |w: &dyn WindowMetrics| {
                if let Some(ctx) = weak.upgrade() {
                    ctx.handle_resized(w);
                }
            }));
        }
    }

    /// 窗口尺寸变化：重新计算并通知，不做防抖
    pub fn handle_resized(&self, window: &dyn WindowMetrics) {
        if !self.is_initialized() {
            return;
        }
        self.measure(window);
        tracing::debug!(
            "窗口尺寸变化: {}x{}, 缩放 {:.3}",
            self.window_size().width,
            self.window_size().height,
            self.uniform_scale()
        );
        self.fire_scale_changed();
    }

    fn measure(&self, window: &dyn WindowMetrics) {
        let size = effective_size(window);
        self.inner.window_size.set(size);
        self.inner.state.set(compute_scale(size, &self.baseline()));
    }

    /// 缩放单个设计值
    pub fn scale(&self, design_value: f64) -> f64 {
        design_value * self.baseline().dpi_scale * self.uniform_scale()
    }

    pub fn scale_thickness(&self, t: Thickness) -> Thickness {
        t.map(|v| self.scale(v))
    }

    pub fn scale_corner_radius(&self, r: CornerRadius) -> CornerRadius {
        r.map(|v| self.scale(v))
    }

    /// 订阅缩放变化，返回的句柄被释放时自动取消订阅
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.listeners.borrow_mut().push(Listener {
            id,
            callback: Rc::new(callback),
        });
        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// 不持有状态的弱句柄，供订阅回调捕获，避免循环引用
    pub fn downgrade(&self) -> WeakScaleContext {
        WeakScaleContext {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// 按注册顺序同步调用所有订阅者
    fn fire_scale_changed(&self) {
        let snapshot: Vec<(u64, Rc<dyn Fn()>)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|l| (l.id, l.callback.clone()))
            .collect();
        for (id, callback) in snapshot {
            // 通知过程中被取消的订阅不再调用
            if self.inner.is_registered(id) {
                callback();
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct WeakScaleContext {
    inner: Weak<Inner>,
}

impl WeakScaleContext {
    pub fn upgrade(&self) -> Option<ScaleContext> {
        self.inner.upgrade().map(|inner| ScaleContext { inner })
    }
}

/// 缩放变化订阅句柄
#[must_use = "句柄被丢弃时订阅会立即取消"]
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.is_registered(self.id))
    }

    pub fn cancel(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.remove_listener(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ResizeEvent, ResizeHandler};
    use crate::types::DeviceTransform;

    struct TestWindow {
        size: Cell<Size>,
        resized: ResizeEvent,
    }

    impl TestWindow {
        fn new(width: f64, height: f64) -> Self {
            Self {
                size: Cell::new(Size::new(width, height)),
                resized: ResizeEvent::new(),
            }
        }

        fn resize(&self, width: f64, height: f64) {
            self.size.set(Size::new(width, height));
            self.resized.dispatch(self);
        }
    }

    impl WindowMetrics for TestWindow {
        fn actual_size(&self) -> Size {
            self.size.get()
        }
        fn work_area(&self) -> Size {
            Size::new(1920.0, 1040.0)
        }
        fn device_transform(&self) -> Option<DeviceTransform> {
            None
        }
    }

    impl HostWindow for TestWindow {
        fn subscribe_resized(&self, handler: ResizeHandler) {
            self.resized.subscribe(handler);
        }
    }

    fn counter(ctx: &ScaleContext) -> (Rc<Cell<u32>>, Subscription) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = ctx.subscribe(move || h.set(h.get() + 1));
        (hits, sub)
    }

    #[test]
    fn half_size_window() {
        let ctx = ScaleContext::new();
        ctx.initialize(&TestWindow::new(960.0, 540.0));
        let s = ctx.state();
        assert_eq!((s.scale_x, s.scale_y, s.uniform_scale), (0.5, 0.5, 0.5));
        assert_eq!(ctx.scale(40.0), 20.0);
    }

    #[test]
    fn smaller_axis_wins() {
        let ctx = ScaleContext::new();
        ctx.initialize(&TestWindow::new(1280.0, 540.0));
        assert!((ctx.scale_x() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(ctx.scale_y(), 0.5);
        assert_eq!(ctx.uniform_scale(), 0.5);
    }

    #[test]
    fn scale_includes_design_dpi() {
        let ctx = ScaleContext::with_baseline(DesignBaseline {
            width: 1000.0,
            height: 500.0,
            dpi_scale: 1.25,
        });
        ctx.initialize(&TestWindow::new(2000.0, 1500.0));
        assert_eq!(ctx.uniform_scale(), 2.0);
        assert_eq!(ctx.scale(8.0), 20.0);
        assert_eq!(
            ctx.scale_thickness(Thickness::new(1.0, 2.0, 3.0, 4.0)),
            Thickness::new(2.5, 5.0, 7.5, 10.0)
        );
        assert_eq!(
            ctx.scale_corner_radius(CornerRadius::uniform(4.0)),
            CornerRadius::uniform(10.0)
        );
    }

    #[test]
    fn zero_size_falls_back_to_work_area() {
        let ctx = ScaleContext::new();
        ctx.initialize(&TestWindow::new(0.0, 0.0));
        assert_eq!(ctx.window_size(), Size::new(1920.0, 1040.0));
        assert_eq!(ctx.scale_x(), 1.0);
    }

    #[test]
    fn defaults_before_initialize() {
        let ctx = ScaleContext::new();
        assert!(!ctx.is_initialized());
        assert_eq!(ctx.state(), ScaleState::default());
        assert_eq!(ctx.scale(40.0), 40.0);

        // 未初始化时修改基准不通知
        let (hits, _sub) = counter(&ctx);
        assert!(ctx.configure_baseline(1280.0, 720.0, 1.0));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn initialize_notifies_once_and_sets_flag() {
        let ctx = ScaleContext::new();
        let (hits, _sub) = counter(&ctx);
        ctx.initialize(&TestWindow::new(960.0, 540.0));
        assert!(ctx.is_initialized());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn invalid_baseline_is_noop() {
        let ctx = ScaleContext::new();
        ctx.initialize(&TestWindow::new(960.0, 540.0));
        let before = ctx.state();
        let (hits, _sub) = counter(&ctx);

        assert!(!ctx.configure_baseline(0.0, 1080.0, 1.0));
        assert!(!ctx.configure_baseline(1920.0, -5.0, 1.0));
        assert!(!ctx.configure_baseline(1920.0, 1080.0, 0.0));
        assert_eq!(ctx.state(), before);
        assert_eq!(ctx.baseline(), DesignBaseline::default());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn unchanged_baseline_is_noop() {
        let ctx = ScaleContext::new();
        ctx.initialize(&TestWindow::new(960.0, 540.0));
        let (hits, _sub) = counter(&ctx);
        assert!(!ctx.configure_baseline(1920.0, 1080.0, 1.0));
        assert!(!ctx.apply_preset(ResolutionPreset::FullHd1080));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn reconfigure_after_init_fires_exactly_once() {
        let ctx = ScaleContext::new();
        let window = TestWindow::new(1280.0, 720.0);
        ctx.initialize(&window);
        let (hits, _sub) = counter(&ctx);

        assert!(ctx.apply_preset(ResolutionPreset::Hd720));
        assert_eq!(hits.get(), 1);
        assert_eq!(ctx.uniform_scale(), 1.0);

        assert!(ctx.configure_baseline(2560.0, 1440.0, 1.0));
        assert_eq!(hits.get(), 2);
        assert_eq!(ctx.uniform_scale(), 0.5);
    }

    #[test]
    fn every_resize_recomputes_and_fires() {
        let ctx = ScaleContext::new();
        let window = TestWindow::new(1920.0, 1080.0);
        ctx.initialize(&window);
        let (hits, _sub) = counter(&ctx);

        window.resize(960.0, 540.0);
        window.resize(960.0, 540.0);
        window.resize(3840.0, 1080.0);
        assert_eq!(hits.get(), 3);
        assert_eq!(ctx.uniform_scale(), 1.0);
        assert_eq!(ctx.scale_x(), 2.0);
    }

    #[test]
    fn initialize_twice_does_not_duplicate_resize_listener() {
        let ctx = ScaleContext::new();
        let window = TestWindow::new(1920.0, 1080.0);
        ctx.initialize(&window);
        ctx.initialize(&window);
        assert_eq!(window.resized.len(), 1);
    }

    #[test]
    fn dropped_context_ignores_resize() {
        let window = TestWindow::new(1920.0, 1080.0);
        {
            let ctx = ScaleContext::new();
            ctx.initialize(&window);
        }
        window.resize(800.0, 600.0);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let ctx = ScaleContext::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let o = order.clone();
        let _a = ctx.subscribe(move || o.borrow_mut().push(1));
        let o = order.clone();
        let _b = ctx.subscribe(move || o.borrow_mut().push(2));
        ctx.initialize(&TestWindow::new(960.0, 540.0));
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let ctx = ScaleContext::new();
        let window = TestWindow::new(1920.0, 1080.0);
        ctx.initialize(&window);
        let (hits, sub) = counter(&ctx);
        assert!(sub.is_active());
        assert_eq!(ctx.listener_count(), 1);

        drop(sub);
        assert_eq!(ctx.listener_count(), 0);
        window.resize(960.0, 540.0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn dropping_subscription_that_owns_another() {
        let ctx = ScaleContext::new();
        let child = ctx.subscribe(|| {});
        let parent = ctx.subscribe(move || {
            let _ = &child;
        });
        assert_eq!(ctx.listener_count(), 2);

        drop(parent);
        assert_eq!(ctx.listener_count(), 0);
    }

    #[test]
    fn listener_cancelled_mid_dispatch_is_skipped() {
        let ctx = ScaleContext::new();
        let window = TestWindow::new(1920.0, 1080.0);
        ctx.initialize(&window);

        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let s = slot.clone();
        let _first = ctx.subscribe(move || {
            s.borrow_mut().take();
        });
        let (hits, second) = counter(&ctx);
        *slot.borrow_mut() = Some(second);

        window.resize(960.0, 540.0);
        assert_eq!(hits.get(), 0);
        assert_eq!(ctx.listener_count(), 1);
    }
}
