// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use once_cell::sync::Lazy;
use prometheus::{
    HistogramTimer, HistogramVec, IntCounter, IntCounterVec, register_histogram_vec,
    register_int_counter, register_int_counter_vec,
};

// Operation labels
pub const MARSHAL: &str = "marshal";
pub const UNMARSHAL: &str = "unmarshal";

// Result labels
pub const SUCCESS: &str = "success";

// Cache event labels
pub const CACHE_HIT: &str = "hit";
pub const CACHE_MISS: &str = "miss";
pub const CACHE_RESOLVE_ERROR: &str = "resolve_error";

/// Counts marshal/unmarshal operations by result (success or error kind)
pub static OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "column_mapper_operations",
        "Counters related to marshal and unmarshal operations",
        &["operation", "result"]
    )
    .unwrap()
});

/// Latency of marshal/unmarshal operations
pub static OPERATION_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "column_mapper_operation_latency_seconds",
        "Time it takes to marshal or unmarshal a row",
        &["operation"]
    )
    .unwrap()
});

/// Descriptor cache hits, misses and failed resolutions
pub static DESCRIPTOR_CACHE: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "column_mapper_descriptor_cache",
        "Counters related to the mapping descriptor cache",
        &["event"]
    )
    .unwrap()
});

/// Columns ignored on read because no field claimed them
pub static DROPPED_COLUMNS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "column_mapper_dropped_columns",
        "Columns dropped on read because the target type has no catch-all map"
    )
    .unwrap()
});

pub fn start_operation_timer(operation: &str) -> HistogramTimer {
    OPERATION_LATENCY
        .with_label_values(&[operation])
        .start_timer()
}

pub fn increment_operation(operation: &str, result: &str) {
    OPERATIONS.with_label_values(&[operation, result]).inc();
}

pub fn record_cache_event(event: &str) {
    DESCRIPTOR_CACHE.with_label_values(&[event]).inc();
}
