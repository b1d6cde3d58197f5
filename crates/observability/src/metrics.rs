//! Replay 构建指标收集模块
//!
//! 基于合成帧 (`Frame`) 收集和统计构建管道的运行指标。

use std::collections::BTreeMap;

use contracts::{Frame, SyncMode};
use metrics::{counter, gauge, histogram};

/// 从合成帧记录指标
///
/// 每合成一帧调用一次。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_frame_metrics;
///
/// for (tick, frame) in frames.iter().enumerate() {
///     record_frame_metrics(frame, tick);
/// }
/// ```
pub fn record_frame_metrics(frame: &Frame, tick: usize) {
    // 帧计数器
    counter!("replay_frames_total").increment(1);

    // 帧序号 (用于检测跳帧)
    gauge!("replay_last_frame_index").set(tick as f64);

    // 领跑者圈数
    gauge!("replay_leader_lap").set(f64::from(frame.lap));

    // 退赛车辆
    let out = frame.drivers.values().filter(|d| d.is_out).count();
    gauge!("replay_drivers_out").set(out as f64);

    // 非领跑者差距
    for snapshot in frame.drivers.values().skip(1) {
        histogram!("replay_gap_to_leader_s").record(snapshot.gap_to_leader_s);
    }

    // 赛道状态
    if let Some(status) = &frame.track_status {
        if status.is_caution() {
            counter!("replay_caution_frames_total", "status" => status.to_string()).increment(1);
        }
    }
}

/// 记录重采样结果
pub fn record_resample(drivers: usize, excluded: usize, ticks: usize) {
    gauge!("replay_drivers_resampled").set(drivers as f64);
    gauge!("replay_drivers_excluded").set(excluded as f64);
    gauge!("replay_timeline_ticks").set(ticks as f64);
}

/// 记录构建耗时
pub fn record_build_duration_ms(duration_ms: f64) {
    histogram!("replay_build_duration_ms").record(duration_ms);
}

/// 记录同步映射构建
pub fn record_sync_map(mode: SyncMode, pairs: usize) {
    counter!("replay_sync_maps_built_total", "mode" => mode.to_string()).increment(1);
    gauge!("replay_sync_map_pairs", "mode" => mode.to_string()).set(pairs as f64);
}

/// 构建指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct BuildMetricsAggregator {
    /// 总帧数
    pub total_frames: u64,

    /// 黄旗/安全车/红旗/VSC 期间的帧数
    pub caution_frames: u64,

    /// 单帧最大车辆数
    pub max_drivers: usize,

    /// 与领跑者差距统计 (秒)
    pub gap_stats: RunningStats,

    /// 与前车间隔统计 (秒)
    pub interval_stats: RunningStats,

    /// 领跑者速度统计 (km/h)
    pub leader_speed_stats: RunningStats,

    /// 各车手首次退赛的帧序号
    pub retirements: BTreeMap<String, u64>,
}

impl BuildMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, frame: &Frame) {
        let index = self.total_frames;
        self.total_frames += 1;
        self.max_drivers = self.max_drivers.max(frame.drivers.len());

        if frame
            .track_status
            .as_ref()
            .is_some_and(|status| status.is_caution())
        {
            self.caution_frames += 1;
        }

        if let Some((_, leader)) = frame.leader() {
            self.leader_speed_stats.push(leader.speed_kph);
        }

        for (code, snapshot) in frame.drivers.iter().skip(1) {
            if snapshot.is_out {
                self.retirements.entry(code.clone()).or_insert(index);
                continue;
            }
            self.gap_stats.push(snapshot.gap_to_leader_s);
            self.interval_stats.push(snapshot.interval_to_ahead_s);
        }
        if let Some((code, leader)) = frame.leader() {
            if leader.is_out {
                self.retirements.entry(code.clone()).or_insert(index);
            }
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames,
            caution_frames: self.caution_frames,
            caution_rate: if self.total_frames > 0 {
                self.caution_frames as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            },
            max_drivers: self.max_drivers,
            gap_to_leader_s: StatsSummary::from(&self.gap_stats),
            interval_to_ahead_s: StatsSummary::from(&self.interval_stats),
            leader_speed_kph: StatsSummary::from(&self.leader_speed_stats),
            retirements: self.retirements.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub caution_frames: u64,
    pub caution_rate: f64,
    pub max_drivers: usize,
    pub gap_to_leader_s: StatsSummary,
    pub interval_to_ahead_s: StatsSummary,
    pub leader_speed_kph: StatsSummary,
    pub retirements: BTreeMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Replay Build Summary ===")?;
        writeln!(f, "Total frames: {}", self.total_frames)?;
        writeln!(f, "Drivers: {}", self.max_drivers)?;
        writeln!(
            f,
            "Caution frames: {} ({:.2}%)",
            self.caution_frames, self.caution_rate
        )?;
        writeln!(f, "Gap to leader (s): {}", self.gap_to_leader_s)?;
        writeln!(f, "Interval (s): {}", self.interval_to_ahead_s)?;
        writeln!(f, "Leader speed (km/h): {}", self.leader_speed_kph)?;

        if !self.retirements.is_empty() {
            writeln!(f, "Retirements:")?;
            for (code, frame) in &self.retirements {
                writeln!(f, "  {}: frame {}", code, frame)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
