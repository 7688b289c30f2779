//! Save the populated cells of a gridded field to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Date32Builder, Float64Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{cli::create_progress_bar, grid::GriddedField};

pub fn save_gridded(field: &GriddedField, file_path: &Path) -> Result<()> {
    let chunk_size = 100000;
    let total_rows = field.populated_count();

    let file = File::create(file_path)?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("time", DataType::Date32, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
        Field::new(field.mean_name(), DataType::Float64, false),
        Field::new(field.std_name(), DataType::Float64, true),
    ]));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::ZSTD(parquet::basic::ZstdLevel::default()))
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
    let pb = create_progress_bar(total_rows as u64, "Writing parquet file".to_string());

    let mut time_builder = Date32Builder::with_capacity(chunk_size);
    let mut lat_builder = Float64Builder::with_capacity(chunk_size);
    let mut lon_builder = Float64Builder::with_capacity(chunk_size);
    let mut mean_builder = Float64Builder::with_capacity(chunk_size);
    let mut std_builder = Float64Builder::with_capacity(chunk_size);

    // Date32 counts days from 1970-01-01, which is NaiveDate's default
    let days: Vec<i32> = field
        .axes
        .time
        .iter()
        .map(|t| t.date().signed_duration_since(NaiveDate::default()).num_days() as i32)
        .collect();

    let mut current_batch_rows = 0;

    for ((it, iy, ix), mean, std) in field.populated_cells() {
        time_builder.append_value(days[it]);
        lat_builder.append_value(field.axes.lat[iy]);
        lon_builder.append_value(field.axes.lon[ix]);
        mean_builder.append_value(mean);
        std_builder.append_option(std);

        current_batch_rows += 1;
        pb.inc(1);

        if current_batch_rows >= chunk_size {
            write_batch(
                &mut writer,
                &schema,
                &mut time_builder,
                [&mut lat_builder, &mut lon_builder, &mut mean_builder, &mut std_builder],
            )?;
            current_batch_rows = 0;
        }
    }

    if current_batch_rows > 0 {
        write_batch(
            &mut writer,
            &schema,
            &mut time_builder,
            [&mut lat_builder, &mut lon_builder, &mut mean_builder, &mut std_builder],
        )?;
    }

    pb.finish_with_message("Finished writing Parquet file");

    writer.close()?;

    Ok(())
}

fn write_batch(
    writer: &mut ArrowWriter<File>,
    schema: &Arc<Schema>,
    time: &mut Date32Builder,
    [lat, lon, mean, std]: [&mut Float64Builder; 4],
) -> Result<()> {
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(time.finish()) as ArrayRef,
            Arc::new(lat.finish()) as ArrayRef,
            Arc::new(lon.finish()) as ArrayRef,
            Arc::new(mean.finish()) as ArrayRef,
            Arc::new(std.finish()) as ArrayRef,
        ],
    )?;

    writer.write(&batch)?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
