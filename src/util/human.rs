use crate::models::mount::Unit;

/// Convert a raw byte count to `unit`, rounded to one decimal: 53687091200 B → 50.0 GB
pub fn bytes_to_unit(bytes: u64, unit: Unit) -> f64 {
    round1(bytes as f64 / unit.divisor())
}

/// Round to one decimal place, correctly rounded with ties to even.
/// `{:.1}` works on the exact binary value, so 0.15 (stored just below) gives 0.1.
pub fn round1(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    format!("{:.1}", v).parse().unwrap_or(v)
}

/// Format a size that is already in display units: "12.5"
pub fn fmt_size(v: f64) -> String {
    format!("{:.1}", v)
}

/// Format a percentage with one decimal: "84.5%"
pub fn fmt_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}
