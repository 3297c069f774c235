use serde::{Deserialize, Serialize};

/// 默认设计基准：1920x1080 @ 100%
pub const DEFAULT_DESIGN_WIDTH: f64 = 1920.0;
pub const DEFAULT_DESIGN_HEIGHT: f64 = 1080.0;
pub const DEFAULT_DESIGN_DPI_SCALE: f64 = 1.0;

/// 96 DPI = 100% 缩放
pub const STANDARD_DPI: f64 = 96.0;

/// 窗口比例转换器的输出下限
pub const MIN_WINDOW_SCALED_LENGTH: f64 = 10.0;

/// DPI + 窗口组合转换器的输出下限
pub const MIN_DPI_WINDOW_SCALED_LENGTH: f64 = 20.0;

/// 设计基准：布局编写时参照的分辨率与 DPI 缩放
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignBaseline {
    pub width: f64,
    pub height: f64,
    pub dpi_scale: f64,
}

impl Default for DesignBaseline {
    fn default() -> Self {
        Self {
            width: DEFAULT_DESIGN_WIDTH,
            height: DEFAULT_DESIGN_HEIGHT,
            dpi_scale: DEFAULT_DESIGN_DPI_SCALE,
        }
    }
}

impl DesignBaseline {
    /// 三个值都必须 > 0，否则返回 None
    pub fn new(width: f64, height: f64, dpi_scale: f64) -> Option<Self> {
        let baseline = Self {
            width,
            height,
            dpi_scale,
        };
        baseline.is_valid().then_some(baseline)
    }

    pub fn is_valid(&self) -> bool {
        // NaN 也会在这里被拒绝
        self.width > 0.0 && self.height > 0.0 && self.dpi_scale > 0.0
    }
}

/// 预设基准分辨率（均为 100% 缩放）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ResolutionPreset {
    /// 1280x720
    #[value(name = "720p")]
    Hd720,
    /// 1920x1080
    #[value(name = "1080p")]
    FullHd1080,
    /// 2560x1440
    #[value(name = "1440p")]
    Qhd1440,
    /// 3840x2160
    #[value(name = "4k")]
    Uhd2160,
}

impl ResolutionPreset {
    pub fn baseline(self) -> DesignBaseline {
        let (width, height) = match self {
            Self::Hd720 => (1280.0, 720.0),
            Self::FullHd1080 => (1920.0, 1080.0),
            Self::Qhd1440 => (2560.0, 1440.0),
            Self::Uhd2160 => (3840.0, 2160.0),
        };
        DesignBaseline {
            width,
            height,
            dpi_scale: 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hd720 => "720P",
            Self::FullHd1080 => "1080P",
            Self::Qhd1440 => "2K",
            Self::Uhd2160 => "4K",
        }
    }
}
