/// ### English
/// Engine internal modules (frame signalling, rendering, render-thread runtime).
///
/// ### 中文
/// 引擎内部模块（帧信号、渲染、渲染线程运行时）。
pub mod error;
pub mod frame;
pub mod producer;
pub mod rendering;
pub mod runtime;

pub use error::RenderError;
pub use frame::{FrameSignal, WaitOutcome};
pub use producer::FrameProducer;
pub use rendering::{EmbedderEglApi, ExternalTextureId, SurfaceHandle};
pub use runtime::{LifecycleCoordinator, RenderLoopState};
