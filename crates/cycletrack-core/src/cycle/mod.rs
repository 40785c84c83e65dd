//! Cycle inference engine.
//!
//! Pure functions over a subject's entries: segmentation into cycles, phase
//! classification for a date, and the "today" context with the next period
//! prediction. Nothing here performs I/O or keeps state between calls.

mod context;
mod phase;
mod segmentation;

pub use context::{
    cycle_context_with, days_until_next_period, get_cycle_context, CycleContext, TrackingStatus,
};
pub use phase::{
    get_cycle_phase_for_date, most_recent_start, CyclePhase, FertileWindow, PhaseClassifier,
    PhaseReading, FERTILE_DAYS_BEFORE_OVULATION, LUTEAL_PHASE_DAYS, OVULATION_WINDOW_RADIUS,
};
pub use segmentation::{
    identify_cycle_starts, CycleSegment, CycleSegmenter, MAX_STREAK_GAP_DAYS,
    MIN_CYCLE_SPACING_DAYS,
};
