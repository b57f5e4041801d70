/// ### English
/// Frame-ready signalling between the frame producer (decoder side) and the
/// render thread. No frame data crosses this module; the external texture
/// already holds the newest frame once `publish` has been called.
///
/// ### 中文
/// 帧生产者（解码侧）与渲染线程之间的 frame-ready 信号。
/// 本模块不传递帧数据；`publish` 被调用时，external texture 中已持有最新帧。
mod signal;

pub use signal::{FrameSignal, WaitOutcome};
