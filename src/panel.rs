//! Parameter panel model: the values the user tweaks while the demo runs.
//!
//! The panel never draws anything itself. Input handlers call the setters,
//! which clamp to the slider ranges and report whether the mesh needs a rebuild.

use crate::ShapeError;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

pub const LEVEL_RANGE: RangeInclusive<u32> = 0..=8;
pub const ENERGY_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const LIFE_RANGE: RangeInclusive<f32> = 0.1..=10.0;
pub const VITALITY_RANGE: RangeInclusive<f32> = 0.0..=10.0;

/// Requests dispatched by the panel to the render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Rebuild { level: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    level: u32,
    pub energy: f32,
    pub life: f32,
    pub vitality: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            level: 5,
            energy: 0.1,
            life: 1.1,
            vitality: 1.0,
        }
    }
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    value.clamp(*range.start(), *range.end())
}

impl Controls {
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) -> Option<Command> {
        let level = level.clamp(*LEVEL_RANGE.start(), *LEVEL_RANGE.end());
        if level == self.level {
            return None;
        }
        log::debug!("Subdivision level {} -> {}", self.level, level);
        self.level = level;
        Some(Command::Rebuild { level })
    }

    pub fn step_level(&mut self, delta: i32) -> Option<Command> {
        self.set_level(self.level.saturating_add_signed(delta))
    }

    pub fn set_energy(&mut self, value: f32) {
        self.energy = clamp_to(value, &ENERGY_RANGE);
    }

    pub fn set_life(&mut self, value: f32) {
        self.life = clamp_to(value, &LIFE_RANGE);
    }

    pub fn set_vitality(&mut self, value: f32) {
        self.vitality = clamp_to(value, &VITALITY_RANGE);
    }

    /// Rebuild with the current level, even if it did not change.
    pub fn load_scene(&self) -> Command {
        Command::Rebuild { level: self.level }
    }

    /// Restore the reset preset. Note the energy differs from the startup value.
    pub fn reset(&mut self) -> Option<Command> {
        self.energy = 0.5;
        self.life = 1.1;
        self.vitality = 1.0;
        self.set_level(5)
    }
}

/// Counts presented frames and reports the rate once per `interval`.
#[derive(Debug)]
pub struct FrameCounter {
    interval: Duration,
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl FrameCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1),
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Last measured frame rate.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Registers a frame. Returns the new rate when a measurement window closes.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }
}

/// Map a cursor position in window pixels to the shader's mouse vector.
///
/// The result is twice the normalized device coordinate, with y up and `z = w = 0`.
pub fn mouse_ray(cursor: glam::Vec2, size: glam::Vec2) -> glam::Vec4 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return glam::Vec4::ZERO;
    }
    let ndc = glam::Vec2::new(
        cursor.x / size.x * 2.0 - 1.0,
        1.0 - cursor.y / size.y * 2.0,
    );
    (2.0 * ndc).extend(0.0).extend(0.0)
}

/// Parse `#rrggbb` into an opaque RGBA color.
pub fn parse_hex_color(text: &str) -> Result<glam::Vec4, ShapeError> {
    let invalid = || ShapeError::InvalidColor(text.to_string());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    // `from_str_radix` alone would let a `+` sign through
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let mut rgb = [0.0; 3];
    for (c, chunk) in rgb.iter_mut().zip(hex.as_bytes().chunks(2)) {
        let digits = std::str::from_utf8(chunk).map_err(|_| invalid())?;
        *c = u8::from_str_radix(digits, 16).map_err(|_| invalid())? as f32 / 255.0;
    }
    Ok(glam::Vec4::new(rgb[0], rgb[1], rgb[2], 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_changes_emit_rebuild() {
        let mut controls = Controls::default();
        assert_eq!(controls.set_level(5), None);
        assert_eq!(controls.set_level(3), Some(Command::Rebuild { level: 3 }));
        assert_eq!(controls.set_level(20), Some(Command::Rebuild { level: 8 }));
        assert_eq!(controls.step_level(1), None);
        assert_eq!(controls.step_level(-1), Some(Command::Rebuild { level: 7 }));
        controls.set_level(0);
        assert_eq!(controls.step_level(-1), None);
        assert_eq!(controls.load_scene(), Command::Rebuild { level: 0 });
    }

    #[test]
    fn scalars_clamp() {
        let mut controls = Controls::default();
        controls.set_energy(3.0);
        controls.set_life(0.0);
        controls.set_vitality(-2.0);
        assert_eq!(controls.energy, 1.0);
        assert_eq!(controls.life, 0.1);
        assert_eq!(controls.vitality, 0.0);
    }

    #[test]
    fn reset_preset() {
        let mut controls = Controls::default();
        assert_eq!(controls.reset(), None);
        assert_eq!(controls.energy, 0.5);

        controls.set_level(2);
        controls.set_vitality(7.0);
        assert_eq!(controls.reset(), Some(Command::Rebuild { level: 5 }));
        assert_eq!(controls.vitality, 1.0);
        assert_eq!(controls.life, 1.1);
    }

    #[test]
    fn frame_counter() {
        let start = Instant::now();
        let mut counter = FrameCounter::new(start);
        for i in 1..60 {
            assert_eq!(counter.tick(start + Duration::from_millis(i * 16)), None);
        }
        let fps = counter.tick(start + Duration::from_secs(1)).unwrap();
        assert!((fps - 60.0).abs() < 1e-3);
        assert_eq!(counter.fps(), fps);
    }

    #[test]
    fn mouse_mapping() {
        let size = glam::Vec2::new(800.0, 600.0);
        assert_eq!(mouse_ray(glam::Vec2::new(400.0, 300.0), size), glam::Vec4::ZERO);
        assert_eq!(
            mouse_ray(glam::Vec2::new(0.0, 0.0), size),
            glam::Vec4::new(-2.0, 2.0, 0.0, 0.0)
        );
        assert_eq!(
            mouse_ray(glam::Vec2::new(800.0, 600.0), size),
            glam::Vec4::new(2.0, -2.0, 0.0, 0.0)
        );
        assert_eq!(mouse_ray(glam::Vec2::ONE, glam::Vec2::ZERO), glam::Vec4::ZERO);
    }

    #[test]
    fn hex_colors() {
        let c = parse_hex_color("#ff8000").unwrap();
        assert_eq!(c, glam::Vec4::new(1.0, 128.0 / 255.0, 0.0, 1.0));
        assert!(parse_hex_color("ff8000").is_err());
        assert!(parse_hex_color("#ff80").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert_eq!(
            parse_hex_color("#+f+f+f"),
            Err(ShapeError::InvalidColor("#+f+f+f".to_string()))
        );
        assert!(parse_hex_color("#-1ffff").is_err());
        assert_eq!(
            parse_hex_color("#ééé"),
            Err(ShapeError::InvalidColor("#ééé".to_string()))
        );
    }
}
