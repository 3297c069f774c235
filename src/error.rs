use thiserror::Error;

/// 转换参数解析错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("参数为空")]
    Empty,

    #[error("无法解析数值: {0:?}")]
    InvalidNumber(String),

    #[error("分段数量错误: 期望 {expected}，实际 {actual}")]
    PartCount { expected: usize, actual: usize },

    #[error("分辨率格式错误（应为 宽x高）: {0:?}")]
    InvalidResolution(String),

    #[error("数值必须大于 0: {0}")]
    NotPositive(f64),
}

#[derive(Debug, Error)]
pub enum ScaleError {
    /// 反向换算（实际值 -> 设计值）不受支持
    #[error("{converter} 不支持反向转换")]
    ConvertBackUnsupported { converter: &'static str },

    #[error("参数错误: {0}")]
    Param(#[from] ParamError),

    #[error("无效的设计基准: {width}x{height} @ {dpi_scale}")]
    InvalidBaseline {
        width: f64,
        height: f64,
        dpi_scale: f64,
    },
}

pub type ScaleResult<T> = Result<T, ScaleError>;
