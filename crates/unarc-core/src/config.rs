//! Extraction configuration.

/// Options controlling a single materialization run.
///
/// One value of this struct is passed explicitly into
/// [`materialize`](crate::materialize::materialize); there is no global
/// option state.
///
/// # Examples
///
/// ```
/// use unarc_core::ExtractOptions;
///
/// let options = ExtractOptions {
///     verbose: true,
///     ..Default::default()
/// };
/// assert!(options.restore_mtimes);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Restore archived modification times onto extracted entries.
    pub restore_mtimes: bool,

    /// Emit one line per materialized entry.
    pub verbose: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            restore_mtimes: true,
            verbose: false,
        }
    }
}
