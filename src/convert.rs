//! 绑定转换器
//!
//! 由宿主的数据绑定引擎同步调用。参数解析失败时原样返回输入，不向调用方报错；
//! 反向转换一律不支持。

use crate::config::{MIN_DPI_WINDOW_SCALED_LENGTH, MIN_WINDOW_SCALED_LENGTH};
use crate::dpi::DpiSource;
use crate::error::{ParamError, ScaleError, ScaleResult};
use crate::params;
use crate::types::Thickness;

pub trait ValueConverter {
    type Input;
    type Output;

    const NAME: &'static str;

    fn convert(&self, value: Self::Input, parameter: &str) -> Self::Output;

    fn convert_back(&self, _value: Self::Output, _parameter: &str) -> ScaleResult<Self::Input> {
        Err(ScaleError::ConvertBackUnsupported {
            converter: Self::NAME,
        })
    }
}

fn log_bad_param(converter: &str, parameter: &str, err: &ParamError) {
    tracing::debug!("{}: 参数 {:?} 无效，保持原值: {}", converter, parameter, err);
}

/// 设计值 × DPI 缩放
///
/// 参数为设计值，如 `"40"`。
#[derive(Debug, Clone, Default)]
pub struct DpiScaleConverter {
    dpi: DpiSource,
}

impl DpiScaleConverter {
    pub fn new(dpi: DpiSource) -> Self {
        Self { dpi }
    }
}

impl ValueConverter for DpiScaleConverter {
    type Input = f64;
    type Output = f64;

    const NAME: &'static str = "DpiScaleConverter";

    fn convert(&self, value: f64, parameter: &str) -> f64 {
        match params::parse_number(parameter) {
            Ok(design) => self.dpi.scale(design),
            Err(e) => {
                log_bad_param(Self::NAME, parameter, &e);
                value
            }
        }
    }
}

/// 按窗口尺寸的百分比计算长度
///
/// 输入为窗口宽或高，参数为比例（0-1），结果不小于 10。
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowScaleConverter;

impl ValueConverter for WindowScaleConverter {
    type Input = f64;
    type Output = f64;

    const NAME: &'static str = "WindowScaleConverter";

    fn convert(&self, window_dimension: f64, parameter: &str) -> f64 {
        match params::parse_number(parameter) {
            Ok(ratio) => (window_dimension * ratio).max(MIN_WINDOW_SCALED_LENGTH),
            Err(e) => {
                log_bad_param(Self::NAME, parameter, &e);
                window_dimension
            }
        }
    }
}

/// 同时处理窗口比例与 DPI
///
/// 参数格式 `"比例:设计宽x高"`，如 `"0.5:1920x1080"`。只有比例参与计算，结果不小于 20。
#[derive(Debug, Clone, Default)]
pub struct DpiWindowScaleConverter {
    dpi: DpiSource,
}

impl DpiWindowScaleConverter {
    pub fn new(dpi: DpiSource) -> Self {
        Self { dpi }
    }
}

impl ValueConverter for DpiWindowScaleConverter {
    type Input = f64;
    type Output = f64;

    const NAME: &'static str = "DpiWindowScaleConverter";

    fn convert(&self, window_dimension: f64, parameter: &str) -> f64 {
        match params::parse_ratio_param(parameter) {
            Ok(p) => {
                let result = window_dimension * p.ratio / self.dpi.scale_x();
                result.max(MIN_DPI_WINDOW_SCALED_LENGTH)
            }
            Err(e) => {
                log_bad_param(Self::NAME, parameter, &e);
                window_dimension
            }
        }
    }
}

/// 参数给出的四边厚度 × DPI 缩放
///
/// 参数格式 `"上,右,下,左"`；输入厚度只在解析失败时原样返回。
#[derive(Debug, Clone, Default)]
pub struct DpiThicknessConverter {
    dpi: DpiSource,
}

impl DpiThicknessConverter {
    pub fn new(dpi: DpiSource) -> Self {
        Self { dpi }
    }
}

impl ValueConverter for DpiThicknessConverter {
    type Input = Thickness;
    type Output = Thickness;

    const NAME: &'static str = "DpiThicknessConverter";

    fn convert(&self, value: Thickness, parameter: &str) -> Thickness {
        match params::parse_thickness(parameter) {
            Ok(t) => self.dpi.scale_thickness(t.top, t.right, t.bottom, t.left),
            Err(e) => {
                log_bad_param(Self::NAME, parameter, &e);
                value
            }
        }
    }
}

/// 多值转换：窗口宽高 + 设计分辨率 `"1920,1080"` -> 统一缩放系数
///
/// 参数无效时返回 1.0。
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponsiveScaleConverter;

impl ValueConverter for ResponsiveScaleConverter {
    type Input = (f64, f64);
    type Output = f64;

    const NAME: &'static str = "ResponsiveScaleConverter";

    fn convert(&self, (window_width, window_height): (f64, f64), parameter: &str) -> f64 {
        match params::parse_design_size(parameter) {
            Ok(design) => {
                let scale_x = window_width / design.width;
                let scale_y = window_height / design.height;
                scale_x.min(scale_y)
            }
            Err(e) => {
                log_bad_param(Self::NAME, parameter, &e);
                1.0
            }
        }
    }
}
