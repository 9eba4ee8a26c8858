//! Frame delta clamping and FPS measurement for the host loop

use crate::config::GameConfig;
use crate::consts::MAX_RAW_FRAME_DT;

/// What the host should do with one measured frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Delta to hand to `Engine::update`
    pub dt: f32,
    /// Frames counted over the last second, once per second
    pub fps: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    max_tick_dt: f32,
    frames: u32,
    accumulated: f32,
}

impl FrameClock {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_tick_dt: config.max_tick_dt(),
            frames: 0,
            accumulated: 0.0,
        }
    }

    /// Clamp a measured delta. Stalls (debugger, app switch) are capped at
    /// 50 ms before the per-tick limit applies.
    pub fn tick(&mut self, raw_dt: f32) -> FrameTick {
        let raw = if raw_dt.is_finite() {
            raw_dt.clamp(0.0, MAX_RAW_FRAME_DT)
        } else {
            0.0
        };

        self.frames += 1;
        self.accumulated += raw;
        let fps = if self.accumulated >= 1.0 {
            let fps = self.frames;
            self.frames = 0;
            self.accumulated = 0.0;
            Some(fps)
        } else {
            None
        };

        FrameTick {
            dt: raw.min(self.max_tick_dt),
            fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new(&GameConfig::default());
        assert_eq!(clock.tick(0.01).dt, 0.01);
        // 2 / 60 per tick
        assert!((clock.tick(0.045).dt - 2.0 / 60.0).abs() < 1e-6);
        assert!((clock.tick(3.0).dt - 2.0 / 60.0).abs() < 1e-6);
        assert_eq!(clock.tick(-1.0).dt, 0.0);
        assert_eq!(clock.tick(f32::INFINITY).dt, 0.0);
    }

    #[test]
    fn test_low_target_fps_uses_raw_cap() {
        let config = GameConfig {
            target_fps: 10,
            ..Default::default()
        };
        let mut clock = FrameClock::new(&config);
        assert_eq!(clock.tick(1.0).dt, MAX_RAW_FRAME_DT);
    }

    #[test]
    fn test_fps_reported_once_per_second() {
        let mut clock = FrameClock::new(&GameConfig::default());
        let dt = 1.0 / 64.0;
        for _ in 0..63 {
            assert_eq!(clock.tick(dt).fps, None);
        }
        assert_eq!(clock.tick(dt).fps, Some(64));
        assert_eq!(clock.tick(dt).fps, None);
    }

    #[test]
    fn test_stalls_do_not_inflate_fps_window() {
        let mut clock = FrameClock::new(&GameConfig::default());
        // Each stall only counts 50 ms toward the window
        for _ in 0..19 {
            assert_eq!(clock.tick(5.0).fps, None);
        }
        let fps = (0..2).find_map(|_| clock.tick(5.0).fps);
        assert!(matches!(fps, Some(20 | 21)));
    }
}
