//! 附加缩放行为
//!
//! 给界面元素附加设计时的宽、高、边距、内边距、圆角、字号后，
//! 元素的实际属性会立即按当前缩放换算一次，并在之后每次缩放变化时重新换算。
//! 元素卸载时释放它的全部订阅。
//!
//! 每个元素的订阅按属性存放在 [`BehaviorSlots`] 中，同一属性重复附加会替换旧订阅，
//! 不会产生重复的更新回调。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::dpi::DpiSource;
use crate::scale::{ScaleContext, Subscription};
use crate::types::{CornerRadius, Thickness};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalableProperty {
    Width,
    Height,
    Margin,
    Padding,
    CornerRadius,
    FontSize,
    /// 占窗口宽度的比例
    PercentWidth,
    /// 占窗口高度的比例
    PercentHeight,
}

/// 具有内边距的元素（Border、Control、TextBlock 等）
pub trait HasScalableThickness {
    fn set_padding(&self, padding: Thickness);
}

pub trait HasScalableCornerRadius {
    fn set_corner_radius(&self, radius: CornerRadius);
}

pub trait HasScalableFontSize {
    fn set_font_size(&self, size: f64);
}

/// 宿主界面元素
///
/// 宽、高、外边距是所有元素都有的属性；内边距、圆角、字号只有部分元素支持，
/// 通过对应的 `*_target` 方法返回能力对象，不支持时返回 None。
pub trait UiElement: 'static {
    fn set_width(&self, width: f64);
    fn set_height(&self, height: f64);
    fn set_margin(&self, margin: Thickness);

    fn padding_target(&self) -> Option<&dyn HasScalableThickness> {
        None
    }

    fn corner_radius_target(&self) -> Option<&dyn HasScalableCornerRadius> {
        None
    }

    fn font_size_target(&self) -> Option<&dyn HasScalableFontSize> {
        None
    }

    /// 元素自身持有的订阅槽
    fn behavior_slots(&self) -> &BehaviorSlots;

    /// 元素从界面树移除时调用一次
    fn subscribe_unloaded(&self, handler: Box<dyn FnOnce()>);
}

/// 按属性保存的缩放订阅
#[derive(Default)]
pub struct BehaviorSlots {
    slots: RefCell<HashMap<ScalableProperty, Subscription>>,
    unload_hooked: Cell<bool>,
}

impl fmt::Debug for BehaviorSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.borrow();
        f.debug_struct("BehaviorSlots")
            .field("properties", &slots.keys().collect::<Vec<_>>())
            .field("unload_hooked", &self.unload_hooked.get())
            .finish()
    }
}

impl BehaviorSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self, property: ScalableProperty) -> bool {
        self.slots.borrow().contains_key(&property)
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn replace(&self, property: ScalableProperty, subscription: Subscription) {
        let old = self.slots.borrow_mut().insert(property, subscription);
        drop(old);
    }

    fn remove(&self, property: ScalableProperty) {
        let old = self.slots.borrow_mut().remove(&property);
        drop(old);
    }

    /// 释放全部订阅
    pub fn release_all(&self) {
        let released = std::mem::take(&mut *self.slots.borrow_mut());
        if !released.is_empty() {
            tracing::debug!("元素卸载，释放 {} 个缩放订阅", released.len());
        }
        self.unload_hooked.set(false);
        drop(released);
    }
}

fn ensure_unload_hook<E: UiElement + ?Sized>(element: &Rc<E>) {
    if element.behavior_slots().unload_hooked.replace(true) {
        return;
    }
    let weak = Rc::downgrade(element);
    element.subscribe_unloaded(Box::new(move || {
        if let Some(element) = weak.upgrade() {
            element.behavior_slots().release_all();
        }
    }));
}

/// 立即应用一次（已初始化时），并订阅之后的缩放变化
///
/// 回调只持有元素和注册表的弱引用。
fn attach<E, F>(ctx: &ScaleContext, element: &Rc<E>, property: ScalableProperty, update: F)
where
    E: UiElement + ?Sized,
    F: Fn(&ScaleContext, &E) + 'static,
{
    ensure_unload_hook(element);

    if ctx.is_initialized() {
        update(ctx, &**element);
    }

    let weak_ctx = ctx.downgrade();
    let weak_element = Rc::downgrade(element);
    let subscription = ctx.subscribe(move || {
        if let (Some(ctx), Some(element)) = (weak_ctx.upgrade(), weak_element.upgrade()) {
            update(&ctx, &*element);
        }
    });
    element.behavior_slots().replace(property, subscription);
}

/// 取消某个属性的缩放
pub fn detach<E: UiElement + ?Sized>(element: &Rc<E>, property: ScalableProperty) {
    element.behavior_slots().remove(property);
}

fn is_positive(v: f64) -> bool {
    v > 0.0 && v.is_finite()
}

fn is_valid_thickness(t: &Thickness) -> bool {
    [t.left, t.top, t.right, t.bottom].iter().all(|v| v.is_finite())
}

fn is_valid_corner_radius(r: &CornerRadius) -> bool {
    [r.top_left, r.top_right, r.bottom_right, r.bottom_left]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
}

/// 设计宽度；<= 0 时取消该属性的缩放
pub fn attach_width<E: UiElement + ?Sized>(ctx: &ScaleContext, element: &Rc<E>, width: f64) {
    if !is_positive(width) {
        detach(element, ScalableProperty::Width);
        return;
    }
    attach(ctx, element, ScalableProperty::Width, move |ctx, el| {
        el.set_width(ctx.scale(width))
    });
}

pub fn attach_height<E: UiElement + ?Sized>(ctx: &ScaleContext, element: &Rc<E>, height: f64) {
    if !is_positive(height) {
        detach(element, ScalableProperty::Height);
        return;
    }
    attach(ctx, element, ScalableProperty::Height, move |ctx, el| {
        el.set_height(ctx.scale(height))
    });
}

pub fn attach_margin<E: UiElement + ?Sized>(ctx: &ScaleContext, element: &Rc<E>, margin: Thickness) {
    if !is_valid_thickness(&margin) {
        detach(element, ScalableProperty::Margin);
        return;
    }
    attach(ctx, element, ScalableProperty::Margin, move |ctx, el| {
        el.set_margin(ctx.scale_thickness(margin))
    });
}

/// 元素不支持内边距时静默跳过
pub fn attach_padding<E: UiElement + ?Sized>(ctx: &ScaleContext, element: &Rc<E>, padding: Thickness) {
    if !is_valid_thickness(&padding) {
        detach(element, ScalableProperty::Padding);
        return;
    }
    attach(ctx, element, ScalableProperty::Padding, move |ctx, el| {
        if let Some(target) = el.padding_target() {
            target.set_padding(ctx.scale_thickness(padding));
        }
    });
}

pub fn attach_corner_radius<E: UiElement + ?Sized>(
    ctx: &ScaleContext,
    element: &Rc<E>,
    radius: CornerRadius,
) {
    if !is_valid_corner_radius(&radius) {
        detach(element, ScalableProperty::CornerRadius);
        return;
    }
    attach(ctx, element, ScalableProperty::CornerRadius, move |ctx, el| {
        if let Some(target) = el.corner_radius_target() {
            target.set_corner_radius(ctx.scale_corner_radius(radius));
        }
    });
}

pub fn attach_font_size<E: UiElement + ?Sized>(ctx: &ScaleContext, element: &Rc<E>, size: f64) {
    if !is_positive(size) {
        detach(element, ScalableProperty::FontSize);
        return;
    }
    attach(ctx, element, ScalableProperty::FontSize, move |ctx, el| {
        if let Some(target) = el.font_size_target() {
            target.set_font_size(ctx.scale(size));
        }
    });
}

/// 宽度 = 窗口实际宽度 × 比例 / DPI 缩放
pub fn attach_percent_width<E: UiElement + ?Sized>(
    ctx: &ScaleContext,
    dpi: &DpiSource,
    element: &Rc<E>,
    percent: f64,
) {
    if !is_positive(percent) {
        detach(element, ScalableProperty::PercentWidth);
        return;
    }
    let dpi = dpi.clone();
    attach(ctx, element, ScalableProperty::PercentWidth, move |ctx, el| {
        el.set_width(ctx.window_size().width * percent / dpi.scale_x())
    });
}

/// 高度 = 窗口实际高度 × 比例 / DPI 缩放
pub fn attach_percent_height<E: UiElement + ?Sized>(
    ctx: &ScaleContext,
    dpi: &DpiSource,
    element: &Rc<E>,
    percent: f64,
) {
    if !is_positive(percent) {
        detach(element, ScalableProperty::PercentHeight);
        return;
    }
    let dpi = dpi.clone();
    attach(ctx, element, ScalableProperty::PercentHeight, move |ctx, el| {
        el.set_height(ctx.window_size().height * percent / dpi.scale_y())
    });
}
