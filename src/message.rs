//! Per-user notification decision rule.
//!
//! Turns a representative price, the latest day-over-day change, the
//! trailing-window spike flag, and the rewritten buying tip into the message
//! string handed to the delivery endpoint.

/// Builds the notification message for one user.
///
/// `representative` is in the provider's sub-unit scale and is divided by 10
/// for display at one decimal place. `change` is the latest-vs-previous
/// percentage change for the user's fuel, `None` when the store holds no
/// usable history for it.
pub fn build_message(
    fuel_label: &str,
    representative: f64,
    change: Option<f64>,
    spike: bool,
    tip: &str,
) -> String {
    let price = representative / 10.0;
    let tip = tip.to_lowercase();

    let Some(pct) = change else {
        return format!("{fuel_label} @{price:.1} (no recent history) {tip}");
    };

    let rounded = round2(pct);
    let pct = pct_string(rounded);

    if spike {
        format!(
            "{fuel_label} @{price:.1} (+{pct}%) prices have spiked within the last week, exercise caution"
        )
    } else if rounded > 0.0 {
        format!("{fuel_label} @{price:.1} (+{pct}%) {tip}")
    } else {
        format!("{fuel_label} @{price:.1} ({pct}%) {tip}")
    }
}

/// Display form of a rounded percentage: integral values keep a trailing
/// `.0` (`10.0`, not `10`); negative values carry their own sign.
fn pct_string(pct: f64) -> String {
    if pct == pct.trunc() {
        format!("{pct:.1}")
    } else {
        format!("{pct}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
