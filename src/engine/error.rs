//! ### English
//! Error taxonomy for the video-presentation pipeline.
//!
//! Context-creation and allocation failures are terminal for the surface
//! instance that produced them: they are reported upward and never retried.
//!
//! ### 中文
//! 视频呈现管线的错误分类。
//!
//! 上下文创建失败与资源分配失败对当前 surface 实例是终结性的：
//! 只向上层报告，不做重试。

use thiserror::Error;

/// ### English
/// Errors surfaced by the render pipeline.
///
/// Teardown paths (`stop`, `detach`, producer release) never raise; only the
/// start/draw paths produce these.
///
/// ### 中文
/// 渲染管线对外暴露的错误。
///
/// 清理路径（`stop`、`detach`、producer 释放）永不报错；
/// 只有启动/绘制路径会产生这些错误。
#[derive(Debug, Error)]
pub enum RenderError {
    /// ### English
    /// GPU resource allocation failed (e.g. external texture name).
    ///
    /// ### 中文
    /// GPU 资源分配失败（例如 external texture name）。
    #[error("GPU resource allocation failed: {0}")]
    Allocation(String),

    /// ### English
    /// Render context creation or surface binding failed.
    ///
    /// ### 中文
    /// 渲染上下文创建或 surface 绑定失败。
    #[error("render context creation failed: {0}")]
    ContextCreation(String),

    /// ### English
    /// `start` was called while a previous render loop had not reached
    /// `Stopped`. This is a lifecycle-ordering defect in the caller, not a
    /// recoverable runtime condition.
    ///
    /// ### 中文
    /// 在上一个渲染循环尚未到达 `Stopped` 时调用了 `start`。
    /// 这是调用方的生命周期顺序缺陷，不是可恢复的运行时状态。
    #[error("render loop is already running")]
    AlreadyRunning,

    /// ### English
    /// A draw or present call failed on the render thread.
    ///
    /// ### 中文
    /// 渲染线程上的绘制或呈现调用失败。
    #[error("draw/present failed: {0}")]
    Draw(String),
}
