// Defaults used when the environment leaves a setting out.
pub const DEFAULT_LENGTH: usize = 16;
pub const DEFAULT_PATH_LENGTH: usize = 12; // Cells per corridor before detouring to a held branch.
pub const DEFAULT_BUD_COUNT: usize = 1; // Extra branch points budded per resumption.
pub const DEFAULT_STRAIGHT_BIAS: f64 = 0.9;
pub const DEFAULT_WALL_HUG_BIAS: f64 = 0.75;
