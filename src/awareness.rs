//! 进程 DPI 感知声明
//!
//! 不同 Windows 版本提供的 API 不同：
//! - Windows 10 1703+：`SetProcessDpiAwarenessContext`（Per-Monitor V2）
//! - Windows 8.1+：`SetProcessDpiAwareness`（Per-Monitor）
//! - Vista / 7：`SetProcessDPIAware`（系统级）
//!
//! 启动时探测一次可用的最高级别，失败时逐级降级。全部失败也不影响运行，
//! 界面交给系统位图拉伸。

use once_cell::sync::OnceCell;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DpiAwareness {
    Unavailable,
    LegacyAware,
    PerMonitorAware,
    PerMonitorAwareV2,
}

impl DpiAwareness {
    /// 下一个更低的级别
    pub fn fallback(self) -> Self {
        match self {
            Self::PerMonitorAwareV2 => Self::PerMonitorAware,
            Self::PerMonitorAware => Self::LegacyAware,
            Self::LegacyAware | Self::Unavailable => Self::Unavailable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unavailable => "未声明",
            Self::LegacyAware => "系统级",
            Self::PerMonitorAware => "Per-Monitor",
            Self::PerMonitorAwareV2 => "Per-Monitor V2",
        }
    }
}

static APPLIED: OnceCell<DpiAwareness> = OnceCell::new();

/// 探测系统提供的最高感知级别
pub fn detect() -> DpiAwareness {
    let mut level = DpiAwareness::PerMonitorAwareV2;
    while level != DpiAwareness::Unavailable {
        if sys::is_supported(level) {
            return level;
        }
        level = level.fallback();
    }
    DpiAwareness::Unavailable
}

/// 声明进程为 Per-Monitor V2 感知（必须在创建任何窗口之前调用）
///
/// 只在第一次调用时生效，返回实际声明成功的级别。
pub fn enable_per_monitor_v2() -> DpiAwareness {
    *APPLIED.get_or_init(|| {
        let detected = detect();
        let applied = apply_from(detected);
        tracing::info!("DPI 感知: {}", applied.label());
        applied
    })
}

/// 已声明的级别，尚未调用 [`enable_per_monitor_v2`] 时为 None
pub fn applied() -> Option<DpiAwareness> {
    APPLIED.get().copied()
}

fn apply_from(level: DpiAwareness) -> DpiAwareness {
    apply_with(level, sys::apply)
}

/// 从 `level` 开始逐级尝试 `apply`，返回第一个成功的级别
///
/// 失败只记录警告并降级，全部失败时返回 [`DpiAwareness::Unavailable`]。
pub fn apply_with<F>(mut level: DpiAwareness, apply: F) -> DpiAwareness
where
    F: Fn(DpiAwareness) -> std::io::Result<()>,
{
    while level != DpiAwareness::Unavailable {
        match apply(level) {
            Ok(()) => return level,
            Err(e) => {
                tracing::warn!("{} 声明失败，尝试降级: {}", level.label(), e);
                level = level.fallback();
            }
        }
    }
    DpiAwareness::Unavailable
}

#[cfg(windows)]
mod sys {
    use super::DpiAwareness;
    use libloading::{Library, Symbol};

    type SetProcessDpiAwarenessContext = unsafe extern "system" fn(context: isize) -> i32;
    type SetProcessDpiAwareness = unsafe extern "system" fn(value: i32) -> i32;
    type SetProcessDpiAware = unsafe extern "system" fn() -> i32;

    const DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2: isize = -4;
    const PROCESS_PER_MONITOR_DPI_AWARE: i32 = 2;

    /// 各级别所在的系统库与导出函数名
    fn entry_point(level: DpiAwareness) -> Option<(&'static str, &'static str)> {
        match level {
            DpiAwareness::PerMonitorAwareV2 => {
                Some(("user32.dll", "SetProcessDpiAwarenessContext\0"))
            }
            DpiAwareness::PerMonitorAware => Some(("shcore.dll", "SetProcessDpiAwareness\0")),
            DpiAwareness::LegacyAware => Some(("user32.dll", "SetProcessDPIAware\0")),
            DpiAwareness::Unavailable => None,
        }
    }

    fn load(level: DpiAwareness) -> Option<(Library, &'static [u8])> {
        let (library, name) = entry_point(level)?;
        // SAFETY: 只加载系统库，其初始化例程没有额外要求
        let library = unsafe { Library::new(library) }.ok()?;
        Some((library, name.as_bytes()))
    }

    pub fn is_supported(level: DpiAwareness) -> bool {
        let Some((library, name)) = load(level) else {
            return false;
        };
        // SAFETY: 只检查导出是否存在，不调用
        unsafe { library.get::<unsafe extern "system" fn()>(name) }.is_ok()
    }

    pub fn apply(level: DpiAwareness) -> std::io::Result<()> {
        let Some((library, name)) = load(level) else {
            return Err(std::io::Error::other("系统库不存在"));
        };
        let missing = |e: libloading::Error| std::io::Error::other(e.to_string());

        // SAFETY: 函数签名与 Win32 声明一致
        unsafe {
            match level {
                DpiAwareness::PerMonitorAwareV2 => {
                    let f: Symbol<SetProcessDpiAwarenessContext> =
                        library.get(name).map_err(missing)?;
                    if f(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) != 0 {
                        Ok(())
                    } else {
                        Err(std::io::Error::last_os_error())
                    }
                }
                DpiAwareness::PerMonitorAware => {
                    let f: Symbol<SetProcessDpiAwareness> = library.get(name).map_err(missing)?;
                    match f(PROCESS_PER_MONITOR_DPI_AWARE) {
                        0 => Ok(()),
                        hr => Err(std::io::Error::other(format!("HRESULT 0x{:08X}", hr as u32))),
                    }
                }
                DpiAwareness::LegacyAware => {
                    let f: Symbol<SetProcessDpiAware> = library.get(name).map_err(missing)?;
                    if f() != 0 {
                        Ok(())
                    } else {
                        Err(std::io::Error::last_os_error())
                    }
                }
                DpiAwareness::Unavailable => Ok(()),
            }
        }
    }
}

#[cfg(not(windows))]
mod sys {
    use super::DpiAwareness;

    pub fn is_supported(_level: DpiAwareness) -> bool {
        false
    }

    pub fn apply(_level: DpiAwareness) -> std::io::Result<()> {
        Err(std::io::Error::other("当前平台不支持"))
    }
}
