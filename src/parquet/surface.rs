//! Save the surface pCO2 observations to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float64Array, TimestampSecondArray},
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::reading::SurfaceRecord;

pub fn save_surface(records: &[SurfaceRecord], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("time", DataType::Timestamp(TimeUnit::Second, None), false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
        Field::new("depth", DataType::Float64, false),
        Field::new("spco2", DataType::Float64, false),
    ]));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let num_rows = records.len();

    let mut times = Vec::with_capacity(num_rows);
    let mut lats = Vec::with_capacity(num_rows);
    let mut lons = Vec::with_capacity(num_rows);
    let mut depths = Vec::with_capacity(num_rows);
    let mut spco2s = Vec::with_capacity(num_rows);

    for r in records {
        times.push(r.time.and_utc().timestamp());
        lats.push(r.lat);
        lons.push(r.lon);
        depths.push(r.depth);
        spco2s.push(r.spco2);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampSecondArray::from(times)) as ArrayRef,
        Arc::new(Float64Array::from(lats)) as ArrayRef,
        Arc::new(Float64Array::from(lons)) as ArrayRef,
        Arc::new(Float64Array::from(depths)) as ArrayRef,
        Arc::new(Float64Array::from(spco2s)) as ArrayRef,
    ];

    let batch = RecordBatch::try_new(schema, columns)?;

    writer.write(&batch)?;

    writer.close()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
