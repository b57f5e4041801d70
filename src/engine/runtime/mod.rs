/// ### English
/// Render-thread runtime: the loop state machine, the dedicated render
/// thread, and the lifecycle coordinator that glues UI-driven events to safe
/// start/stop of the pipeline.
///
/// ### 中文
/// 渲染线程运行时：循环状态机、独立渲染线程，以及把 UI 驱动事件接到管线
/// 安全启停上的生命周期协调器。
mod coordinator;
mod render_loop;
mod render_thread;
mod state;
#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::LifecycleCoordinator;
pub use render_loop::RenderLoop;
pub use state::RenderLoopState;
