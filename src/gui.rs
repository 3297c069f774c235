use std::cell::{Cell, RefCell};
use std::rc::Rc;

use eframe::egui;

use dpiscale::behavior::{
    self, BehaviorSlots, HasScalableCornerRadius, HasScalableFontSize, HasScalableThickness,
    UiElement,
};
use dpiscale::host::{HostWindow, ResizeEvent, ResizeHandler, WindowMetrics};
use dpiscale::{
    CornerRadius, DeviceTransform, DpiSource, ResolutionPreset, ScaleContext, Size, Thickness,
};

/// egui 视口包装成宿主窗口，尺寸单位为逻辑点
struct EguiWindow {
    size: Cell<Size>,
    work_area: Cell<Size>,
    pixels_per_point: Cell<f32>,
    resized: ResizeEvent,
}

impl EguiWindow {
    fn new() -> Self {
        Self {
            size: Cell::new(Size::default()),
            work_area: Cell::new(Size::default()),
            pixels_per_point: Cell::new(1.0),
            resized: ResizeEvent::new(),
        }
    }

    /// 读取本帧的视口信息，尺寸或 DPI 有变化时返回 true
    fn sync(&self, ctx: &egui::Context) -> bool {
        let rect = ctx.screen_rect();
        let size = Size::new(rect.width() as f64, rect.height() as f64);
        let ppp = ctx.pixels_per_point();
        if let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) {
            self.work_area
                .set(Size::new(monitor.x as f64, monitor.y as f64));
        }

        let changed = size != self.size.get() || ppp != self.pixels_per_point.get();
        self.size.set(size);
        self.pixels_per_point.set(ppp);
        changed
    }
}

impl WindowMetrics for EguiWindow {
    fn actual_size(&self) -> Size {
        self.size.get()
    }

    fn work_area(&self) -> Size {
        self.work_area.get()
    }

    fn device_transform(&self) -> Option<DeviceTransform> {
        let ppp = self.pixels_per_point.get() as f64;
        Some(DeviceTransform::new(ppp, ppp))
    }
}

impl HostWindow for EguiWindow {
    fn subscribe_resized(&self, handler: ResizeHandler) {
        self.resized.subscribe(handler);
    }
}

/// 演示用卡片：宽高、边距、内边距、圆角、字号都由附加行为驱动
struct DemoCard {
    title: String,
    width: Cell<f64>,
    height: Cell<f64>,
    margin: Cell<Thickness>,
    padding: Cell<Thickness>,
    corner_radius: Cell<CornerRadius>,
    font_size: Cell<f64>,
    /// 分隔条没有内边距、圆角和字号
    decorated: bool,
    slots: BehaviorSlots,
    unloaded: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl DemoCard {
    fn new(title: &str, decorated: bool) -> Rc<Self> {
        Rc::new(Self {
            title: title.to_string(),
            width: Cell::new(0.0),
            height: Cell::new(0.0),
            margin: Cell::new(Thickness::default()),
            padding: Cell::new(Thickness::default()),
            corner_radius: Cell::new(CornerRadius::default()),
            font_size: Cell::new(14.0),
            decorated,
            slots: BehaviorSlots::new(),
            unloaded: RefCell::new(Vec::new()),
        })
    }

    fn unload(&self) {
        let handlers = std::mem::take(&mut *self.unloaded.borrow_mut());
        for handler in handlers {
            handler();
        }
    }

    fn show(&self, ui: &mut egui::Ui, fill: egui::Color32) {
        let m = self.margin.get();
        let p = self.padding.get();
        let r = self.corner_radius.get();
        egui::Frame::none()
            .fill(fill)
            .outer_margin(egui::Margin {
                left: m.left as f32,
                right: m.right as f32,
                top: m.top as f32,
                bottom: m.bottom as f32,
            })
            .inner_margin(egui::Margin {
                left: p.left as f32,
                right: p.right as f32,
                top: p.top as f32,
                bottom: p.bottom as f32,
            })
            .rounding(egui::Rounding {
                nw: r.top_left as f32,
                ne: r.top_right as f32,
                se: r.bottom_right as f32,
                sw: r.bottom_left as f32,
            })
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(self.width.get() as f32, self.height.get() as f32));
                ui.set_max_width(self.width.get() as f32);
                if self.decorated {
                    ui.label(
                        egui::RichText::new(&self.title)
                            .size(self.font_size.get() as f32)
                            .color(egui::Color32::WHITE),
                    );
                    ui.label(
                        egui::RichText::new(format!(
                            "{:.0} x {:.0}",
                            self.width.get(),
                            self.height.get()
                        ))
                        .size((self.font_size.get() * 0.75) as f32)
                        .color(egui::Color32::LIGHT_GRAY),
                    );
                }
            });
    }
}

impl UiElement for DemoCard {
    fn set_width(&self, width: f64) {
        self.width.set(width);
    }

    fn set_height(&self, height: f64) {
        self.height.set(height);
    }

    fn set_margin(&self, margin: Thickness) {
        self.margin.set(margin);
    }

    fn padding_target(&self) -> Option<&dyn HasScalableThickness> {
        self.decorated.then_some(self as &dyn HasScalableThickness)
    }

    fn corner_radius_target(&self) -> Option<&dyn HasScalableCornerRadius> {
        self.decorated.then_some(self as &dyn HasScalableCornerRadius)
    }

    fn font_size_target(&self) -> Option<&dyn HasScalableFontSize> {
        self.decorated.then_some(self as &dyn HasScalableFontSize)
    }

    fn behavior_slots(&self) -> &BehaviorSlots {
        &self.slots
    }

    fn subscribe_unloaded(&self, handler: Box<dyn FnOnce()>) {
        self.unloaded.borrow_mut().push(handler);
    }
}

impl HasScalableThickness for DemoCard {
    fn set_padding(&self, padding: Thickness) {
        self.padding.set(padding);
    }
}

impl HasScalableCornerRadius for DemoCard {
    fn set_corner_radius(&self, radius: CornerRadius) {
        self.corner_radius.set(radius);
    }
}

impl HasScalableFontSize for DemoCard {
    fn set_font_size(&self, size: f64) {
        self.font_size.set(size);
    }
}

pub struct DemoApp {
    scale: ScaleContext,
    dpi: DpiSource,
    window: EguiWindow,
    cards: Vec<Rc<DemoCard>>,
    banner: Rc<DemoCard>,
    loaded: bool,
    title: String,
}

impl DemoApp {
    pub fn new(scale: ScaleContext) -> Self {
        let dpi = DpiSource::new();

        // 设计稿（1920x1080）中的三张卡片
        let cards: Vec<Rc<DemoCard>> = ["侧栏", "内容", "详情"]
            .iter()
            .map(|title| {
                let card = DemoCard::new(title, true);
                behavior::attach_width(&scale, &card, 360.0);
                behavior::attach_height(&scale, &card, 240.0);
                behavior::attach_margin(&scale, &card, Thickness::uniform(12.0));
                behavior::attach_padding(&scale, &card, Thickness::new(24.0, 16.0, 24.0, 16.0));
                behavior::attach_corner_radius(&scale, &card, CornerRadius::uniform(16.0));
                behavior::attach_font_size(&scale, &card, 28.0);
                card
            })
            .collect();

        // 占窗口宽度 80% 的分隔条
        let banner = DemoCard::new("分隔条", false);
        behavior::attach_percent_width(&scale, &dpi, &banner, 0.8);
        behavior::attach_height(&scale, &banner, 8.0);

        Self {
            scale,
            dpi,
            window: EguiWindow::new(),
            cards,
            banner,
            loaded: false,
            title: String::new(),
        }
    }

    /// 对应窗口的 Loaded 事件
    fn on_loaded(&mut self) {
        self.dpi.initialize(&self.window);
        self.scale.initialize(&self.window);
        self.loaded = true;
    }

    fn info_text(&self) -> (String, String) {
        let dpi = self.dpi.state();
        let (dpi_x, dpi_y) = dpi.dpi();
        let (pct_x, pct_y) = dpi.percent();
        let size = self.window.actual_size();
        let baseline = self.scale.baseline();
        (
            format!("DPI: {}x{} (缩放: {}%, {}%)", dpi_x, dpi_y, pct_x, pct_y),
            format!(
                "窗口尺寸: {:.0}x{:.0} | 设计基准: {}x{} @ {:.0}% | 缩放系数: {:.3}",
                size.width,
                size.height,
                baseline.width as i64,
                baseline.height as i64,
                baseline.dpi_scale * 100.0,
                self.scale.uniform_scale()
            ),
        )
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        let size = self.window.actual_size();
        let baseline = self.scale.baseline();
        let title = format!(
            "DPI 缩放示例窗口 - {:.0}x{:.0} | 基准: {}x{} @ {:.0}%",
            size.width,
            size.height,
            baseline.width as i64,
            baseline.height as i64,
            baseline.dpi_scale * 100.0
        );
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let changed = self.window.sync(ctx);
        if !self.loaded {
            self.on_loaded();
        } else if changed {
            // 跨显示器移动时 DPI 也可能变化
            self.dpi.initialize(&self.window);
            self.window.resized.dispatch(&self.window);
        }
        self.update_title(ctx);

        let (dpi_line, size_line) = self.info_text();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(dpi_line);
            ui.label(size_line);

            ui.horizontal_wrapped(|ui| {
                for preset in [
                    ResolutionPreset::Hd720,
                    ResolutionPreset::FullHd1080,
                    ResolutionPreset::Qhd1440,
                    ResolutionPreset::Uhd2160,
                ] {
                    if ui.button(preset.label()).clicked() {
                        self.scale.apply_preset(preset);
                    }
                }
                if !self.cards.is_empty() && ui.button("移除最后一张卡片").clicked() {
                    if let Some(card) = self.cards.pop() {
                        card.unload();
                    }
                }
            });
            ui.separator();

            self.banner.show(ui, egui::Color32::from_rgb(60, 120, 230));
            ui.horizontal_wrapped(|ui| {
                for card in &self.cards {
                    card.show(ui, egui::Color32::from_rgb(70, 80, 100));
                }
            });
        });
    }
}
