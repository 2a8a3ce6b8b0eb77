/// Largest valid field dimension (cells per side). Keeps grid allocation
/// and coordinate arithmetic well inside usize range.
pub const MAX_FIELD_SIZE: usize = 4096;

/// Side length of the hive footprint. The hive occupies a HIVE_SIDE x
/// HIVE_SIDE block of cells chosen once at colony creation.
pub const HIVE_SIDE: usize = 2;

/// Retry cap for random placement (hive block, flowers). Exceeding it
/// surfaces `FieldError::PlacementExhausted`: the field is too crowded
/// for its configured resource density.
pub const PLACEMENT_MAX_RETRIES: usize = 10_000;
