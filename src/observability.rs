//! Structured diagnostics for the hypergraph builder and the time-bin planner.
//!
//! Both pipelines make data-dependent decisions (which unit wins, how many
//! entities survive null skipping). The `log_metric!` macro emits those
//! decisions as one-line key/value records through the `log` facade so they
//! can be grepped out of a test run with `RUST_LOG=debug`.
//!
//! The `#[cfg(debug_assertions)]` guard compiles every call out of release builds.

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use hyperframe::log_metric;
/// let rings = 5;
/// log_metric!("event"="time_axis_plan", "unit"="D", "rings"=&rings);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            log::debug!("HYPERFRAME_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
