//! Engine constants and tuning parameters.

/// Frame rate the app drives the frame loop at by default (Hz).
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Delay between `start()` and level setup, in seconds.
/// Lets a previous level's teardown finish first.
pub const LEVEL_START_DELAY: f64 = 0.1;

// --- Component limits ---

/// Maximum spin speed per axis (radians per second).
pub const MAX_SPIN_SPEED: f32 = 50.0;

/// Minimum mass of a dynamic rigid body (kg).
pub const MIN_BODY_MASS: f32 = 0.001;

/// Smallest allowed collider extent or cube size.
pub const MIN_EXTENT: f32 = 0.001;

/// Camera field of view bounds (degrees).
pub const MIN_FOV_DEGREES: f32 = 10.0;
pub const MAX_FOV_DEGREES: f32 = 170.0;

/// Font size bounds (pixels).
pub const MIN_FONT_SIZE: f32 = 4.0;
pub const MAX_FONT_SIZE: f32 = 512.0;

// --- Prefab defaults ---

/// Default menu item width (world units).
pub const MENU_ITEM_WIDTH: f32 = 4.0;

/// Default menu item height (world units).
pub const MENU_ITEM_HEIGHT: f32 = 1.0;

/// Default font size (pixels).
pub const DEFAULT_FONT_SIZE: f32 = 64.0;

/// Vertical spacing between stacked menu items (world units).
pub const MENU_ITEM_SPACING: f32 = 1.5;

/// Default menu panel color.
pub const MENU_PANEL_COLOR: u32 = 0x223344;

/// Default menu label color.
pub const MENU_TEXT_COLOR: u32 = 0xffffff;

/// Default spinning cube edge length.
pub const CUBE_SIZE: f32 = 1.0;

/// Default cube color.
pub const CUBE_COLOR: u32 = 0x44aa88;

/// Default character movement speed (units per second).
pub const CHARACTER_SPEED: f32 = 3.0;

// --- Physics demo ---

/// Color a target takes while something overlaps the sensor.
pub const HIGHLIGHT_COLOR: u32 = 0xff3030;

/// Seconds between periodic impulses.
pub const IMPULSE_PERIOD: f64 = 2.0;

/// Seconds between periodic torque impulses.
pub const TORQUE_PERIOD: f64 = 3.5;

/// Base upward impulse applied to impulse targets.
pub const IMPULSE_STRENGTH: f32 = 6.0;

/// Base torque impulse applied to impulse targets.
pub const TORQUE_STRENGTH: f32 = 1.5;

/// Max horizontal jitter added to each impulse.
pub const IMPULSE_JITTER: f32 = 1.0;
