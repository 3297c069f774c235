mod cli;
mod gui;

use clap::Parser;
use eframe::egui;

use crate::cli::CliArgs;
use crate::gui::DemoApp;
use dpiscale::{awareness, ScaleContext};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_ansi(false)
        .init();

    if let Some(window_size) = &args.report {
        return cli::run_report(&args, window_size);
    }

    // 必须在任何窗口创建之前调用
    awareness::enable_per_monitor_v2();

    let scale = ScaleContext::new();
    cli::apply_baseline(&scale, &args)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("DPI 缩放示例窗口")
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([480.0, 270.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "dpiscale-demo",
        options,
        Box::new(move |_cc| Ok(Box::new(DemoApp::new(scale)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI 运行失败: {}", e))?;

    Ok(())
}
