//! Global configuration for gffkit runtime behavior.
//!
//! This module provides thread-safe global configuration that affects
//! how strictly data lines and attributes are validated without threading options through
//! every parsing call.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for lenient phase validation.
///
/// In the default strict mode the phase column must be `.` or one of the
/// reading-frame offsets `0`, `1`, `2`. In lenient mode any integer literal
/// that fits in a `u8` is accepted.
///
/// This is set once at startup and read during parsing.
static LENIENT_PHASE: AtomicBool = AtomicBool::new(false);

/// Enable or disable lenient phase validation.
///
/// # Example
///
/// ```
/// use gffkit::config;
///
/// // Enable at startup before any parsing
/// config::set_lenient_phase(true);
///
/// // Now a phase column of "5" is accepted instead of rejected
/// # config::set_lenient_phase(false);
/// ```
#[inline]
pub fn set_lenient_phase(enabled: bool) {
    LENIENT_PHASE.store(enabled, Ordering::Release);
}

/// Check if lenient phase validation is enabled.
#[inline]
pub fn is_lenient_phase() -> bool {
    LENIENT_PHASE.load(Ordering::Acquire)
}

/// Global flag for lenient attribute parsing.
///
/// Strict mode rejects every attribute segment that is not exactly one
/// `tag=value` pair, including the empty segment left by a trailing `;` and a
/// bare `.` column. Lenient mode skips empty segments and reads `.` as no
/// attributes, which many gene callers (Prodigal among them) emit.
static LENIENT_ATTRIBUTES: AtomicBool = AtomicBool::new(false);

/// Enable or disable lenient attribute parsing.
#[inline]
pub fn set_lenient_attributes(enabled: bool) {
    LENIENT_ATTRIBUTES.store(enabled, Ordering::Release);
}

/// Check if lenient attribute parsing is enabled.
#[inline]
pub fn is_lenient_attributes() -> bool {
    LENIENT_ATTRIBUTES.load(Ordering::Acquire)
}
