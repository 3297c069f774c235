use std::cell::Cell;

use anyhow::Context;
use clap::Parser;
use serde_json::json;

use dpiscale::convert::{
    DpiScaleConverter, DpiThicknessConverter, DpiWindowScaleConverter, ResponsiveScaleConverter,
    ValueConverter, WindowScaleConverter,
};
use dpiscale::host::{HostWindow, ResizeEvent, ResizeHandler, WindowMetrics};
use dpiscale::{params, DeviceTransform, DpiSource, ResolutionPreset, ScaleContext, Size, Thickness};

#[derive(Parser, Debug)]
#[command(author, version, about = "DPI 感知与窗口等比缩放演示", long_about = None)]
pub struct CliArgs {
    /// 预设设计基准
    #[arg(short = 'p', long = "preset", value_enum, conflicts_with = "design")]
    pub preset: Option<ResolutionPreset>,

    /// 自定义设计基准，如 1366x768@1.25
    #[arg(short = 'd', long = "design")]
    pub design: Option<String>,

    /// 不打开窗口，按给定窗口尺寸（如 960x540）输出 JSON 报告
    #[arg(short = 'r', long = "report")]
    pub report: Option<String>,

    /// 报告模式下模拟的 DPI 缩放
    #[arg(long = "dpi", default_value_t = 1.0)]
    pub dpi: f64,

    /// 输出调试日志
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// 启动时设置设计基准（默认 1080P）
pub fn apply_baseline(ctx: &ScaleContext, args: &CliArgs) -> anyhow::Result<()> {
    if let Some(preset) = args.preset {
        ctx.apply_preset(preset);
    } else if let Some(design) = &args.design {
        let baseline = params::parse_baseline(design)
            .with_context(|| format!("无法解析设计基准 {:?}", design))?;
        ctx.set_baseline(baseline);
    }
    Ok(())
}

/// 报告模式使用的模拟窗口
struct SimulatedWindow {
    size: Cell<Size>,
    dpi_scale: f64,
    resized: ResizeEvent,
}

impl WindowMetrics for SimulatedWindow {
    fn actual_size(&self) -> Size {
        self.size.get()
    }

    fn work_area(&self) -> Size {
        Size::new(1920.0, 1040.0)
    }

    fn device_transform(&self) -> Option<DeviceTransform> {
        Some(DeviceTransform::new(self.dpi_scale, self.dpi_scale))
    }
}

impl HostWindow for SimulatedWindow {
    fn subscribe_resized(&self, handler: ResizeHandler) {
        self.resized.subscribe(handler);
    }
}

pub fn run_report(args: &CliArgs, window_size: &str) -> anyhow::Result<()> {
    let size = params::parse_resolution(window_size)
        .with_context(|| format!("无法解析窗口尺寸 {:?}", window_size))?;
    if args.dpi.is_nan() || args.dpi <= 0.0 {
        anyhow::bail!("DPI 缩放必须大于 0: {}", args.dpi);
    }

    let ctx = ScaleContext::new();
    apply_baseline(&ctx, args)?;

    let window = SimulatedWindow {
        size: Cell::new(size),
        dpi_scale: args.dpi,
        resized: ResizeEvent::new(),
    };
    let dpi = DpiSource::new();
    dpi.initialize(&window);
    ctx.initialize(&window);

    let baseline = ctx.baseline();
    let output = json!({
        "code": 0,
        "window": size,
        "baseline": baseline,
        "dpi": dpi.state(),
        "scale": ctx.state(),
        "examples": {
            "scale_40": ctx.scale(40.0),
            "margin_10_20_30_40": ctx.scale_thickness(Thickness::new(40.0, 10.0, 20.0, 30.0)),
            "dpi_value_40": DpiScaleConverter::new(dpi.clone()).convert(40.0, "40"),
            "window_width_half": WindowScaleConverter.convert(size.width, "0.5"),
            "dpi_window_half": DpiWindowScaleConverter::new(dpi.clone())
                .convert(size.width, &format!("0.5:{}x{}", baseline.width, baseline.height)),
            "dpi_thickness": DpiThicknessConverter::new(dpi.clone())
                .convert(Thickness::default(), "10,20,30,40"),
            "responsive_scale": ResponsiveScaleConverter
                .convert((size.width, size.height), &format!("{},{}", baseline.width, baseline.height)),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
