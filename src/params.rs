//! 转换器参数字符串解析
//!
//! 支持的格式：
//! - `"40"`：单个设计值或比例
//! - `"1920,1080"`：设计分辨率
//! - `"0.5:1920x1080"`：比例 + 设计分辨率
//! - `"10,20,30,40"`：上,右,下,左 四边厚度
//! - `"1366x768@1.25"`：命令行自定义基准

use crate::config::DesignBaseline;
use crate::error::{ParamError, ScaleError, ScaleResult};
use crate::types::{Size, Thickness};

pub fn parse_number(s: &str) -> Result<f64, ParamError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParamError::Empty);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParamError::InvalidNumber(s.to_string())),
    }
}

fn parse_positive(s: &str) -> Result<f64, ParamError> {
    let v = parse_number(s)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(ParamError::NotPositive(v))
    }
}

fn split_exact<'a>(s: &'a str, sep: char, expected: usize) -> Result<Vec<&'a str>, ParamError> {
    let parts: Vec<&str> = s.split(sep).collect();
    if parts.len() != expected {
        return Err(ParamError::PartCount {
            expected,
            actual: parts.len(),
        });
    }
    Ok(parts)
}

/// `"1920,1080"`
pub fn parse_design_size(s: &str) -> Result<Size, ParamError> {
    let parts = split_exact(s, ',', 2)?;
    Ok(Size::new(parse_positive(parts[0])?, parse_positive(parts[1])?))
}

/// `"1920x1080"`，大小写 x 均可
pub fn parse_resolution(s: &str) -> Result<Size, ParamError> {
    let s = s.trim();
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| ParamError::InvalidResolution(s.to_string()))?;
    let width = parse_positive(w).map_err(|_| ParamError::InvalidResolution(s.to_string()))?;
    let height = parse_positive(h).map_err(|_| ParamError::InvalidResolution(s.to_string()))?;
    Ok(Size::new(width, height))
}

/// `"比例:设计宽x高"` 形式的组合参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioParam {
    pub ratio: f64,
    /// 设计分辨率只作说明，写错时为 None
    pub design: Option<Size>,
}

/// 必须是两段且比例可解析；第二段不参与计算，不做强制校验
pub fn parse_ratio_param(s: &str) -> Result<RatioParam, ParamError> {
    let parts = split_exact(s, ':', 2)?;
    Ok(RatioParam {
        ratio: parse_number(parts[0])?,
        design: parse_resolution(parts[1]).ok(),
    })
}

/// `"上,右,下,左"`
pub fn parse_thickness(s: &str) -> Result<Thickness, ParamError> {
    let parts = split_exact(s, ',', 4)?;
    let top = parse_number(parts[0])?;
    let right = parse_number(parts[1])?;
    let bottom = parse_number(parts[2])?;
    let left = parse_number(parts[3])?;
    Ok(Thickness::new(left, top, right, bottom))
}

/// `"1366x768"` 或 `"1366x768@1.25"`，省略 DPI 时为 1.0
pub fn parse_baseline(s: &str) -> ScaleResult<DesignBaseline> {
    let (res, dpi) = match s.trim().split_once('@') {
        Some((res, dpi)) => (res, parse_number(dpi)?),
        None => (s, 1.0),
    };
    let size = parse_resolution(res)?;
    DesignBaseline::new(size.width, size.height, dpi).ok_or(ScaleError::InvalidBaseline {
        width: size.width,
        height: size.height,
        dpi_scale: dpi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_trims_and_rejects_garbage() {
        assert_eq!(parse_number(" 0.5 "), Ok(0.5));
        assert_eq!(parse_number(""), Err(ParamError::Empty));
        assert!(matches!(parse_number("abc"), Err(ParamError::InvalidNumber(_))));
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("inf").is_err());
    }

    #[test]
    fn ratio_param() {
        let p = parse_ratio_param("0.5:1920x1080").unwrap();
        assert_eq!(p.ratio, 0.5);
        assert_eq!(p.design, Some(Size::new(1920.0, 1080.0)));

        assert!(matches!(
            parse_ratio_param("0.5"),
            Err(ParamError::PartCount { expected: 2, actual: 1 })
        ));
        let p = parse_ratio_param("0.5:big").unwrap();
        assert_eq!((p.ratio, p.design), (0.5, None));
        assert!(parse_ratio_param("half:1920x1080").is_err());
    }

    #[test]
    fn thickness_is_top_right_bottom_left() {
        let t = parse_thickness("10,20,30,40").unwrap();
        assert_eq!(t, Thickness::new(40.0, 10.0, 20.0, 30.0));
        assert!(parse_thickness("10,20,30").is_err());
        assert!(parse_thickness("10,20,x,40").is_err());
    }

    #[test]
    fn design_size_requires_positive() {
        assert_eq!(parse_design_size("1920,1080"), Ok(Size::new(1920.0, 1080.0)));
        assert_eq!(parse_design_size("0,1080"), Err(ParamError::NotPositive(0.0)));
    }

    #[test]
    fn baseline_string() {
        let b = parse_baseline("1366x768@1.25").unwrap();
        assert_eq!((b.width, b.height, b.dpi_scale), (1366.0, 768.0, 1.25));
        let b = parse_baseline("1280X720").unwrap();
        assert_eq!(b.dpi_scale, 1.0);
        assert!(matches!(
            parse_baseline("1366x768@0"),
            Err(ScaleError::InvalidBaseline { .. })
        ));
        assert!(matches!(parse_baseline("wide"), Err(ScaleError::Param(_))));
    }
}
