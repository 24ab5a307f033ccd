//! Generator configuration.

/// Configuration consulted by the [`Generator`](crate::Generator).
///
/// Exactly two settings exist: the strftime-style date format handed to
/// the date-formatting collaborator, and the pretty-print flag, which
/// changes layout only — never the value stream or the escaping rules.
///
/// # Examples
///
/// ```
/// use jsonpull::JsonConfig;
///
/// let config = JsonConfig {
///     pretty: true,
///     ..Default::default()
/// };
/// assert_eq!(config.date_format, "%Y-%m-%d %H:%M:%S");
/// ```
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Format specifier passed to chrono when writing dates.
    pub date_format: String,

    /// When `true`, human-readable whitespace is inserted between
    /// structural tokens: newline plus two-space indent inside containers
    /// and a space after each `:`.
    ///
    /// # Default
    ///
    /// `false`
    pub pretty: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            pretty: false,
        }
    }
}
