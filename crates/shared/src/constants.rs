// Tick rate
pub const TICK_MS: u64 = 25;
pub const TICK_SECS: f64 = TICK_MS as f64 / 1000.0;
pub const TICKS_PER_SEC: u64 = 1000 / TICK_MS; // 40

// Playfield (toroidal: each edge identifies with its opposite)
pub const FIELD_WIDTH: f32 = 1600.0;
pub const FIELD_HEIGHT: f32 = 1200.0;

// Fighters
pub const FIGHTER_EXTENT: i32 = 80; // square sprite footprint before rotation
pub const MUZZLE_OFFSET: f32 = 10.0; // bullet spawn offset past the nose

// Bullets
pub const BULLET_SPEED: f32 = 300.0;
pub const BULLET_MAX_DISTANCE: f32 = 1200.0;
pub const BULLET_WIDTH: i32 = 3;
pub const BULLET_LENGTH: i32 = 20;

// Obstacle: one static rectangle at the field center
pub const OBSTACLE_WIDTH: i32 = 600;
pub const OBSTACLE_HEIGHT: i32 = 400;

// Impact event sizes consumed by the presentation layer
pub const IMPACT_SIZE_FIGHTER: u32 = 71;
pub const IMPACT_SIZE_BULLET: u32 = 36;

// Headless match defaults
pub const DEFAULT_MAX_TICKS: u64 = TICKS_PER_SEC * 180; // 3 minutes
pub const DEFAULT_FRAME_INTERVAL: u64 = 2; // record every 2nd tick = 20 fps

/// Per-variant stat table. Behavior is uniform across variants; only these
/// constants differ.
#[derive(Debug, Clone, Copy)]
pub struct FighterStats {
    pub top_speed: f32,
    pub min_speed: f32,
    pub start_speed: f32,
    /// Speed delta applied per accelerate/decelerate command.
    pub acceleration: f32,
    /// Degrees per second while turning.
    pub turn_speed: f32,
    pub max_ammo: u32,
    pub start_ammo: u32,
    pub ammo_regen_secs: f64,
    pub fire_delay_secs: f64,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Degrees clockwise from "up"; 90 = east.
    pub spawn_heading: f32,
}

pub const JET_STATS: FighterStats = FighterStats {
    top_speed: 200.0,
    min_speed: 60.0,
    start_speed: 120.0,
    acceleration: 5.0,
    turn_speed: 45.0,
    max_ammo: 5,
    start_ammo: 5,
    ammo_regen_secs: 3.0,
    fire_delay_secs: 1.0,
    spawn_x: 100.0,
    spawn_y: 100.0,
    spawn_heading: 90.0,
};

pub const PROP_STATS: FighterStats = FighterStats {
    top_speed: 150.0,
    min_speed: 50.0,
    start_speed: 100.0,
    acceleration: 5.0,
    turn_speed: 30.0,
    max_ammo: 0, // unarmed; regen and fire delay never apply
    start_ammo: 0,
    ammo_regen_secs: 0.0,
    fire_delay_secs: 1.0,
    spawn_x: 1500.0,
    spawn_y: 1100.0,
    spawn_heading: 270.0,
};
