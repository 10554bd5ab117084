// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Maps typed application objects onto the rows of a keyspace/column-family
//! store and back.
//!
//! A type implements [`Mapped`] to describe which field is the row key,
//! which fields are named columns (required or optional), which field
//! supplies the super column name of a super family, and which field absorbs
//! every remaining column as a map. [`ColumnMapper`] resolves that
//! description once per type, caches it, and converts between objects and
//! [`RowData`].
//!
//! The mapper performs no I/O: rows are handed to, and received from, a
//! storage client that owns connections, consistency levels and retries.

pub mod cache;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod marshal;
pub mod metadata;
mod metrics;
pub mod object;
pub mod row;
pub mod unmarshal;
pub mod value;


pub use crate::{
    cache::DescriptorCache,
    config::{MapperConfig, TimestampPrecision},
    descriptor::MappingDescriptor,
    error::{CodecError, MappingError},
    metadata::{FieldDescription, FieldMarker, FieldType, TypeDescription},
    object::{FieldSet, FieldValue, Mapped},
    row::{ColumnEntry, RowColumns, RowData, SuperColumnEntry},
    value::{ColumnValue, Value, ValueType},
};
use crate::metrics::{MARSHAL, SUCCESS, UNMARSHAL, increment_operation, start_operation_timer};
use std::{any::TypeId, sync::Arc};
use tracing::trace;

/// Converts objects to rows and back.
///
/// Cheap to clone; clones share the descriptor cache. Safe to use from any
/// number of threads.
#[derive(Clone, Debug, Default)]
pub struct ColumnMapper {
    config: MapperConfig,
    cache: Arc<DescriptorCache>,
}

impl ColumnMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self::with_cache(config, Arc::new(DescriptorCache::new()))
    }

    /// Creates a mapper sharing an existing descriptor cache.
    pub fn with_cache(config: MapperConfig, cache: Arc<DescriptorCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }

    /// Returns the descriptor for `T`, resolving it on first use.
    pub fn descriptor<T: Mapped>(&self) -> Result<Arc<MappingDescriptor>, MappingError> {
        self.cache.get_or_resolve(TypeId::of::<T>(), T::describe)
    }

    /// Marshals `object`, stamping every column with the current time.
    pub fn to_row<T: Mapped>(&self, object: &T) -> Result<RowData, MappingError> {
        self.to_row_at(object, self.config.now_timestamp())
    }

    /// Marshals `object`, stamping every column with `timestamp`.
    pub fn to_row_at<T: Mapped>(
        &self,
        object: &T,
        timestamp: i64,
    ) -> Result<RowData, MappingError> {
        observe(MARSHAL, || {
            let descriptor = self.descriptor::<T>()?;
            let row = marshal::marshal(&descriptor, object.to_fields(), timestamp)?;
            trace!(
                type_name = descriptor.type_name(),
                columns = row.column_count(),
                "Marshalled row."
            );
            Ok(row)
        })
    }

    /// Unmarshals a standard row, or a super row holding one super column.
    pub fn from_row<T: Mapped>(&self, row: &RowData) -> Result<T, MappingError> {
        observe(UNMARSHAL, || {
            let descriptor = self.descriptor::<T>()?;
            let fields = unmarshal::unmarshal(&descriptor, row, self.config.verify_family_on_read)?;
            trace!(
                type_name = descriptor.type_name(),
                columns = row.column_count(),
                "Unmarshalled row."
            );
            T::from_fields(fields)
        })
    }

    /// Unmarshals every super column of a super row into its own object.
    pub fn from_super_row<T: Mapped>(&self, row: &RowData) -> Result<Vec<T>, MappingError> {
        observe(UNMARSHAL, || {
            let descriptor = self.descriptor::<T>()?;
            let objects = unmarshal::unmarshal_super(
                &descriptor,
                row,
                self.config.verify_family_on_read,
            )?
            .into_iter()
            .map(T::from_fields)
            .collect::<Result<Vec<_>, _>>()?;
            trace!(
                type_name = descriptor.type_name(),
                objects = objects.len(),
                "Unmarshalled super row."
            );
            Ok(objects)
        })
    }
}

fn observe<R>(
    operation: &'static str,
    f: impl FnOnce() -> Result<R, MappingError>,
) -> Result<R, MappingError> {
    let _timer = start_operation_timer(operation);
    let result = f();
    match &result {
        Ok(_) => increment_operation(operation, SUCCESS),
        Err(error) => increment_operation(operation, error.kind()),
    }
    result
}
