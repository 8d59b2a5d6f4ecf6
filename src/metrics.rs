//! Cart metrics recorded through the `metrics` facade.
//!
//! Nothing here installs a recorder; without one every call is a no-op. An
//! embedding application installs the exporter of its choice.

use std::fmt;

/// Enum representing all metric names used by the cart core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Use-case metrics
    CartLinesAdded,
    CartQuantityMerged,
    CartAddRejected,
    CartQuantityUpdated,
    CartLinesRemoved,
    CartCleared,

    // Persistence metrics
    SnapshotLoadFallback,
    SnapshotWriteError,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CartLinesAdded => "food_cart_lines_added_total",
            MetricName::CartQuantityMerged => "food_cart_quantity_merged_total",
            MetricName::CartAddRejected => "food_cart_add_rejected_total",
            MetricName::CartQuantityUpdated => "food_cart_quantity_updated_total",
            MetricName::CartLinesRemoved => "food_cart_lines_removed_total",
            MetricName::CartCleared => "food_cart_cleared_total",
            MetricName::SnapshotLoadFallback => "food_cart_snapshot_load_fallback_total",
            MetricName::SnapshotWriteError => "food_cart_snapshot_write_error_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            CartLinesAdded,
            CartQuantityMerged,
            CartAddRejected,
            CartQuantityUpdated,
            CartLinesRemoved,
            CartCleared,
            SnapshotLoadFallback,
            SnapshotWriteError,
        ]
        .into_iter()
    }
}

// ============================================================================
// Use-case Metrics
// ============================================================================

pub mod cart {
    use super::MetricName;

    /// Record a new line appended to the cart
    pub fn line_added() {
        ::metrics::counter!(MetricName::CartLinesAdded.as_str()).increment(1);
    }

    /// Record an add merged into an existing line
    pub fn quantity_merged(by: u32) {
        ::metrics::counter!(MetricName::CartQuantityMerged.as_str()).increment(u64::from(by));
    }

    /// Record a rejected add, labelled by reason code
    pub fn add_rejected(reason: &'static str) {
        ::metrics::counter!(MetricName::CartAddRejected.as_str(), "reason" => reason).increment(1);
    }

    pub fn quantity_updated() {
        ::metrics::counter!(MetricName::CartQuantityUpdated.as_str()).increment(1);
    }

    pub fn line_removed() {
        ::metrics::counter!(MetricName::CartLinesRemoved.as_str()).increment(1);
    }

    pub fn cleared() {
        ::metrics::counter!(MetricName::CartCleared.as_str()).increment(1);
    }
}

// ============================================================================
// Persistence Metrics
// ============================================================================

pub mod snapshot {
    use super::MetricName;

    /// Record a load that fell back to an empty cart (`absent` or `corrupt`)
    pub fn load_fallback(cause: &'static str) {
        ::metrics::counter!(MetricName::SnapshotLoadFallback.as_str(), "cause" => cause)
            .increment(1);
    }

    pub fn write_error() {
        ::metrics::counter!(MetricName::SnapshotWriteError.as_str()).increment(1);
    }
}
