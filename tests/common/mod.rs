#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dpiscale::behavior::{
    BehaviorSlots, HasScalableCornerRadius, HasScalableFontSize, HasScalableThickness, UiElement,
};
use dpiscale::host::{HostWindow, ResizeEvent, ResizeHandler, WindowMetrics};
use dpiscale::{CornerRadius, DeviceTransform, Size, Thickness};

pub struct FakeWindow {
    size: Cell<Size>,
    dpi: Cell<Option<DeviceTransform>>,
    pub resized: ResizeEvent,
}

impl FakeWindow {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Cell::new(Size::new(width, height)),
            dpi: Cell::new(None),
            resized: ResizeEvent::new(),
        }
    }

    pub fn with_dpi(self, scale: f64) -> Self {
        self.dpi.set(Some(DeviceTransform::new(scale, scale)));
        self
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.size.set(Size::new(width, height));
        self.resized.dispatch(self);
    }
}

impl WindowMetrics for FakeWindow {
    fn actual_size(&self) -> Size {
        self.size.get()
    }

    fn work_area(&self) -> Size {
        Size::new(1920.0, 1040.0)
    }

    fn device_transform(&self) -> Option<DeviceTransform> {
        self.dpi.get()
    }
}

impl HostWindow for FakeWindow {
    fn subscribe_resized(&self, handler: ResizeHandler) {
        self.resized.subscribe(handler);
    }
}

/// 记录每次属性写入的假元素
#[derive(Default)]
pub struct FakeElement {
    pub width: Cell<Option<f64>>,
    pub height: Cell<Option<f64>>,
    pub margin: Cell<Option<Thickness>>,
    pub padding: Cell<Option<Thickness>>,
    pub corner_radius: Cell<Option<CornerRadius>>,
    pub font_size: Cell<Option<f64>>,
    pub writes: Cell<u32>,
    /// false 时不提供内边距、圆角、字号
    pub rich: bool,
    slots: BehaviorSlots,
    unloaded: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl FakeElement {
    pub fn border() -> Rc<Self> {
        Rc::new(Self {
            rich: true,
            ..Default::default()
        })
    }

    pub fn plain() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn unload(&self) {
        let handlers = std::mem::take(&mut *self.unloaded.borrow_mut());
        for handler in handlers {
            handler();
        }
    }

    pub fn unload_handlers(&self) -> usize {
        self.unloaded.borrow().len()
    }

    fn touch(&self) {
        self.writes.set(self.writes.get() + 1);
    }
}

impl UiElement for FakeElement {
    fn set_width(&self, width: f64) {
        self.touch();
        self.width.set(Some(width));
    }

    fn set_height(&self, height: f64) {
        self.touch();
        self.height.set(Some(height));
    }

    fn set_margin(&self, margin: Thickness) {
        self.touch();
        self.margin.set(Some(margin));
    }

    fn padding_target(&self) -> Option<&dyn HasScalableThickness> {
        self.rich.then_some(self as &dyn HasScalableThickness)
    }

    fn corner_radius_target(&self) -> Option<&dyn HasScalableCornerRadius> {
        self.rich.then_some(self as &dyn HasScalableCornerRadius)
    }

    fn font_size_target(&self) -> Option<&dyn HasScalableFontSize> {
        self.rich.then_some(self as &dyn HasScalableFontSize)
    }

    fn behavior_slots(&self) -> &BehaviorSlots {
        &self.slots
    }

    fn subscribe_unloaded(&self, handler: Box<dyn FnOnce()>) {
        self.unloaded.borrow_mut().push(handler);
    }
}

impl HasScalableThickness for FakeElement {
    fn set_padding(&self, padding: Thickness) {
        self.touch();
        self.padding.set(Some(padding));
    }
}

impl HasScalableCornerRadius for FakeElement {
    fn set_corner_radius(&self, radius: CornerRadius) {
        self.touch();
        self.corner_radius.set(Some(radius));
    }
}

impl HasScalableFontSize for FakeElement {
    fn set_font_size(&self, size: f64) {
        self.touch();
        self.font_size.set(Some(size));
    }
}
