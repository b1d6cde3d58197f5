//! # Sync Engine
//!
//! 帧合成引擎：把所有车手的重采样轨迹合并为按排名排序的帧序列。
//!
//! 负责：
//! - 基于赛道投影的进度计算与排名（发车前按发车格排序）
//! - 领跑者进度曲线反查得到的差距与间隔
//! - 旗帜窗口、天气、退赛状态
//! - 比赛事件提取
//! - `ReplayPipeline` 端到端构建 `ReplayData`
//!
//! ## 使用示例
//!
//! ```ignore
//! use sync_engine::ReplayPipeline;
//! use tokio_util::sync::CancellationToken;
//!
//! let pipeline = ReplayPipeline::new(config);
//! let replay = pipeline.build(session, CancellationToken::new()).await?;
//!
//! for frame in &replay.frames {
//!     if let Some((code, leader)) = frame.leader() {
//!         println!("{:.1}s P1 {} lap {}", frame.t, code, leader.lap);
//!     }
//! }
//! ```

mod engine;
mod events;
mod flags;
mod gap;
mod pipeline;
mod ranking;
mod weather;

// Re-exports
pub use engine::{DriverMeta, FrameSynthesizer, SynthesisInput};
pub use events::extract_race_events;
pub use flags::{active_status, build_flag_windows, shift_race_control};
pub use gap::{intervals, LeaderCurve};
pub use pipeline::ReplayPipeline;
pub use ranking::{rank, RankEntry};
pub use weather::WeatherSeries;

// Re-export contracts types
pub use contracts::{Frame, ReplayData, SynthesizerConfig};
