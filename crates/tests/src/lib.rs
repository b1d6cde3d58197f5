//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 方形赛道上的合成会话 (`fixtures`)
//! - 排名、差距、旗帜与退赛的端到端校验
//! - 双会话同步映射校验

pub mod fixtures;

#[cfg(test)]
mod e2e_tests {
    use std::collections::BTreeMap;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        Frame, RaceEventKind, ReplayData, Rgb, SessionData, TrackStatus, TrackStatusEvent,
        WeatherSample,
    };
    use sync_engine::{extract_race_events, ReplayPipeline};
    use tokio_util::sync::CancellationToken;

    use crate::fixtures::{self, driver_on_square, session, steady_driver};

    async fn build(session: SessionData, fps: u32) -> ReplayData {
        ReplayPipeline::new(fixtures::config(fps))
            .build(session, CancellationToken::new())
            .await
            .unwrap()
    }

    fn frame_at(replay: &ReplayData, t: f64) -> &Frame {
        replay
            .frames
            .iter()
            .find(|f| (f.t - t).abs() < 1e-9)
            .unwrap()
    }

    fn leader(frame: &Frame) -> &str {
        frame.leader().map(|(code, _)| code.as_str()).unwrap()
    }

    /// Race with a caution period, a retirement and mixed team colors
    fn full_session() -> SessionData {
        let mut retired = driver_on_square("CCC", 2, 15.0, |t| t * 9.5);
        retired.dnf = true;
        retired.grid_position = Some(3);

        let mut session = session(
            "Square GP",
            vec![
                steady_driver("AAA", 2, 10.0),
                steady_driver("BBB", 2, 9.0),
                retired,
            ],
        );
        session.track_status = vec![
            TrackStatusEvent {
                time_s: 0.0,
                status_code: "1".into(),
            },
            TrackStatusEvent {
                time_s: 5.0,
                status_code: "2".into(),
            },
            TrackStatusEvent {
                time_s: 8.0,
                status_code: "1".into(),
            },
        ];
        session.weather = vec![
            WeatherSample {
                time_s: 0.0,
                track_temp_c: 30.0,
                air_temp_c: 20.0,
                humidity_pct: 50.0,
                ..Default::default()
            },
            WeatherSample {
                time_s: 30.0,
                track_temp_c: 36.0,
                air_temp_c: 20.0,
                humidity_pct: 50.0,
                ..Default::default()
            },
        ];
        session.driver_colors = BTreeMap::from([
            ("AAA".to_string(), "#FF8000".to_string()),
            ("BBB".to_string(), "nope".to_string()),
        ]);
        session
    }

    /// Identical start, BBB quicker off the line and slower afterwards.
    /// Progress crosses at t = 8 s (80 m); both stop sampling at 19.9 s.
    #[tokio::test]
    async fn test_positions_swap_where_progress_crosses() {
        let session = session(
            "Crossing",
            vec![
                steady_driver("AAA", 2, 10.0),
                driver_on_square("BBB", 2, 19.9, |t| {
                    if t <= 4.0 {
                        12.0 * t
                    } else {
                        48.0 + 8.0 * (t - 4.0)
                    }
                }),
            ],
        );
        let replay = build(session, 4).await;
        assert_eq!(replay.frame_count(), 80);

        // equal progress on the grid, code order
        let order: Vec<&String> = replay.frames[0].drivers.keys().collect();
        assert_eq!(order, ["AAA", "BBB"]);

        for frame in &replay.frames {
            if (0.5..=7.0).contains(&frame.t) {
                assert_eq!(leader(frame), "BBB", "t={}", frame.t);
            }
            if (9.0..=19.0).contains(&frame.t) {
                assert_eq!(leader(frame), "AAA", "t={}", frame.t);
            }
        }

        let swap = replay
            .frames
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, f)| leader(f) == "AAA")
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(swap, 32);
        assert!((replay.frames[swap].t - 8.0).abs() < 1e-9);

        // AAA passed 88 m at 8.8 s
        let frame = frame_at(&replay, 9.0);
        let bbb = &frame.drivers["BBB"];
        assert!((frame.drivers["AAA"].progress_m - 90.0).abs() < 0.5);
        assert!((bbb.progress_m - 88.0).abs() < 0.5);
        assert!((bbb.gap_to_leader_s - 0.2).abs() < 0.1);
    }

    #[tokio::test]
    async fn test_full_session_flags_retirement_and_bundle() {
        let replay = build(full_session(), 4).await;

        assert_eq!(replay.info.event_name, "Square GP");
        assert_eq!(replay.total_laps, 2);
        assert!((replay.track_length_m - 100.0).abs() < 1e-6);
        assert_eq!(replay.drs_zones.len(), 1);

        assert_eq!(replay.driver_colors["AAA"], Rgb(255, 128, 0));
        assert_eq!(replay.driver_colors["BBB"], Rgb::GREY);
        assert_eq!(replay.driver_colors["CCC"], Rgb::GREY);

        assert_eq!(frame_at(&replay, 2.0).track_status, Some(TrackStatus::Green));
        assert_eq!(frame_at(&replay, 6.5).track_status, Some(TrackStatus::Yellow));
        assert_eq!(frame_at(&replay, 9.0).track_status, Some(TrackStatus::Green));
        assert!(replay.frames.iter().all(|f| f.weather.is_some()));

        for frame in &replay.frames {
            let out = frame.drivers["CCC"].is_out;
            if frame.t <= 14.5 {
                assert!(!out, "t={}", frame.t);
            }
            if frame.t >= 15.0 {
                assert!(out, "t={}", frame.t);
            }
            assert!(!frame.drivers["AAA"].is_out);
        }

        let events = extract_race_events(&replay.frames, &replay.flag_windows, replay.fps);
        let dnfs: Vec<_> = events
            .iter()
            .filter(|e| e.kind == RaceEventKind::Dnf)
            .collect();
        assert_eq!(dnfs.len(), 1);
        assert_eq!(dnfs[0].label, "CCC");
        assert_eq!(dnfs[0].frame, 60);

        let yellow = events
            .iter()
            .find(|e| e.kind == RaceEventKind::YellowFlag)
            .unwrap();
        assert_eq!(yellow.frame, 20);
        assert_eq!(yellow.end_frame, Some(32));

        // CCC (9.5 m/s) moves past BBB (9 m/s) on the first tick off the grid
        let first_pass = events
            .iter()
            .find(|e| matches!(e.kind, RaceEventKind::Overtake { .. }))
            .unwrap();
        assert_eq!(first_pass.frame, 1);
        assert_eq!(first_pass.label, "CCC");
        assert_eq!(
            first_pass.kind,
            RaceEventKind::Overtake {
                overtaken: "BBB".into()
            }
        );
        assert!(events.iter().all(|e| e.kind != RaceEventKind::PitStop));
    }

    #[tokio::test]
    async fn test_frame_invariants_hold_for_every_tick() {
        let replay = build(full_session(), 4).await;

        for frame in &replay.frames {
            let positions: Vec<u32> = frame.drivers.values().map(|d| d.position).collect();
            let expected: Vec<u32> = (1..=frame.drivers.len() as u32).collect();
            assert_eq!(positions, expected, "t={}", frame.t);

            let (_, p1) = frame.leader().unwrap();
            assert_eq!(p1.gap_to_leader_s, 0.0);
            assert_eq!(frame.lap, p1.lap);

            for snapshot in frame.drivers.values() {
                assert!(snapshot.gap_to_leader_s >= 0.0);
                assert!(snapshot.interval_to_ahead_s >= 0.0);
                assert!((0.0..=100.0).contains(&snapshot.brake_pct));
            }

            let progress: Vec<f64> = frame.drivers.values().map(|d| d.progress_m).collect();
            let gaps: Vec<f64> = frame.drivers.values().map(|d| d.gap_to_leader_s).collect();
            assert!(progress.windows(2).all(|w| w[0] >= w[1]), "t={}", frame.t);
            assert!(gaps.windows(2).all(|w| w[0] <= w[1] + 1e-9), "t={}", frame.t);
        }
    }

    #[tokio::test]
    async fn test_config_file_drives_build_and_replay_reloads() {
        let config = ConfigLoader::load_from_str(
            r#"
fps = 2

[projector]
dense_points = 401
track_width = 2.0

[synthesizer]
grid_order_threshold_m = 0.0
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let replay = ReplayPipeline::new(config)
            .build(full_session(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(replay.fps, 2);
        // BBB finishes last: 200 m at 9 m/s, final sample at 22.2 s
        assert_eq!(replay.frame_count(), 45);

        let json = serde_json::to_string(&replay).unwrap();
        let reloaded: ReplayData = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.frame_count(), replay.frame_count());
        assert_eq!(reloaded.flag_windows, replay.flag_windows);
        assert_eq!(reloaded.driver_colors, replay.driver_colors);
        let order = |r: &ReplayData| -> Vec<Vec<String>> {
            r.frames
                .iter()
                .map(|f| f.drivers.keys().cloned().collect())
                .collect()
        };
        assert_eq!(order(&reloaded), order(&replay));
    }

    #[tokio::test]
    async fn test_fastest_lap_reference_ignores_retired_partial_lap() {
        let mut retired = driver_on_square("CCC", 2, 13.0, |t| t * 10.0);
        retired.dnf = true;
        let mut session = session(
            "No Reference",
            vec![steady_driver("AAA", 2, 10.0), retired],
        );
        session.reference_lap = None;

        let replay = build(session, 4).await;
        // a full lap sampled every meter from 0 m to 99 m
        assert!(
            (replay.track_length_m - 99.0).abs() < 0.5,
            "track length {}",
            replay.track_length_m
        );
        let last = replay.frames.last().unwrap();
        assert_eq!(leader(last), "AAA");
        assert!(last.drivers["CCC"].is_out);
    }

    /// Lap-boundary samples straddle the line: 12 m/s crosses it at 8.33 s,
    /// between the 8.3 s and 8.4 s rows.
    #[tokio::test]
    async fn test_progress_survives_line_crossing_between_samples() {
        let session = session(
            "Straddle",
            vec![steady_driver("AAA", 2, 12.0), steady_driver("BBB", 2, 11.0)],
        );
        let replay = build(session, 20).await;

        for frame in &replay.frames {
            assert_eq!(leader(frame), "AAA", "t={}", frame.t);
        }
        for code in ["AAA", "BBB"] {
            let progress: Vec<f64> = replay
                .frames
                .iter()
                .map(|f| f.drivers[code].progress_m)
                .collect();
            assert!(
                progress.windows(2).all(|w| w[1] >= w[0] - 1e-9),
                "{code} progress went backwards"
            );
        }

        let crossing = frame_at(&replay, 8.35);
        let aaa = &crossing.drivers["AAA"];
        assert_eq!(aaa.lap, 1);
        assert!((aaa.progress_m - 100.4).abs() < 0.05, "progress {}", aaa.progress_m);
    }

    #[tokio::test]
    async fn test_driver_without_telemetry_is_excluded() {
        let mut session = session("Sparse", vec![steady_driver("AAA", 1, 10.0)]);
        session.drivers.push(contracts::DriverLaps {
            code: "ZZZ".into(),
            ..Default::default()
        });
        let replay = build(session, 2).await;
        assert!(replay.driver_colors.contains_key("AAA"));
        assert!(!replay.driver_colors.contains_key("ZZZ"));
        assert!(replay.frames.iter().all(|f| f.drivers.len() == 1));
    }
}

#[cfg(test)]
mod comparison_tests {
    use std::sync::Arc;

    use comparison::{build_distance_map, build_lap_map, build_time_map, MultiSessionSynchronizer};
    use contracts::{ReplayData, ReplayError, SyncMode};
    use sync_engine::ReplayPipeline;
    use tokio_util::sync::CancellationToken;

    use crate::fixtures::{self, session, steady_driver};

    async fn build_pair() -> (ReplayData, ReplayData) {
        let pipeline = ReplayPipeline::new(fixtures::config(2));
        let a = pipeline
            .build(
                session(
                    "Two laps",
                    vec![steady_driver("AAA", 2, 10.0), steady_driver("BBB", 2, 9.0)],
                ),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        let b = pipeline
            .build(
                session(
                    "Three laps",
                    vec![steady_driver("AAA", 3, 10.0), steady_driver("BBB", 3, 9.5)],
                ),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        (a, b)
    }

    #[tokio::test]
    async fn test_distance_map_across_different_lap_counts() {
        let (a, b) = build_pair().await;
        assert_eq!(a.total_laps, 2);
        assert_eq!(b.total_laps, 3);
        assert_eq!(a.frame_count(), 45);
        assert_eq!(b.frame_count(), 63);

        let map = build_distance_map(&a, &b).unwrap();
        assert_eq!(map.len(), a.frame_count());
        assert!(map.windows(2).all(|w| w[1].frame_b >= w[0].frame_b));
        for (i, pair) in map.iter().enumerate() {
            assert_eq!(pair.frame_a, i);
            assert!(pair.frame_b < b.frame_count());
        }
    }

    #[tokio::test]
    async fn test_time_and_lap_maps() {
        let (a, b) = build_pair().await;

        let time = build_time_map(&a, &b).unwrap();
        assert_eq!(time.len(), a.frame_count());
        assert!(time.iter().all(|p| p.frame_a == p.frame_b));

        let lap = build_lap_map(&a, &b).unwrap();
        assert!(!lap.is_empty());
        for pair in &lap {
            assert!(pair.frame_a < a.frame_count());
            assert!(pair.frame_b < b.frame_count());
            assert_eq!(a.frames[pair.frame_a].lap, b.frames[pair.frame_b].lap);
        }
        assert!(lap.windows(2).all(|w| w[1].frame_a >= w[0].frame_a));
    }

    #[tokio::test]
    async fn test_synchronizer_modes_and_metrics() {
        let (a, b) = build_pair().await;
        let mut sync = MultiSessionSynchronizer::new(Arc::new(a), Arc::new(b), SyncMode::Distance);
        assert!(sync.unavailable().is_none());

        let metrics = sync.comparison_metrics(20).unwrap();
        assert_eq!(metrics.mode, SyncMode::Distance);
        assert_eq!(metrics.leader_a.as_deref(), Some("AAA"));
        assert_eq!(metrics.leader_b.as_deref(), Some("AAA"));
        assert_eq!(metrics.position_deltas.get("AAA"), Some(&0));
        let aaa = sync.time_delta(20, "AAA").unwrap();
        assert!(aaa.abs() < 1.0, "time delta {aaa}");

        // past the end of the map the last pair is served
        let last = sync.get_synchronized_frames(usize::MAX).unwrap();
        assert!(std::ptr::eq(last.0, sync.session_a().frames.last().unwrap()));

        sync.set_mode(SyncMode::Lap);
        assert_eq!(sync.mode(), SyncMode::Lap);
        assert!(sync.total_frames() > 0);

        let empty = Arc::new(ReplayData::default());
        let sync = MultiSessionSynchronizer::new(Arc::clone(&empty), empty, SyncMode::Lap);
        assert!(matches!(
            sync.unavailable(),
            Some(ReplayError::SyncModeUnavailable { .. })
        ));
        assert!(sync.get_synchronized_frames(0).is_none());
    }
}
