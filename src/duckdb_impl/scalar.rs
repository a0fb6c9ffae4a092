//! Shared DuckDB scalar invoke helpers.
//!
//! # Safety
//! These helpers MUST only be called from within a DuckDB scalar `invoke()` while the
//! underlying vectors are valid.

use std::error::Error;
use std::ffi::CString;

use duckdb::{
    Result,
    core::{DataChunkHandle, FlatVector, Inserter, LogicalTypeId},
    types::DuckString,
    vtab::arrow::WritableVector,
};
use libduckdb_sys::duckdb_string_t;

use super::result_set::sanitize_for_cstring;

fn ensure_type(
    vec: &FlatVector,
    expected: LogicalTypeId,
    label: &str,
) -> Result<(), Box<dyn Error>> {
    let actual = vec.logical_type().id();
    if actual != expected {
        return Err(format!(
            "scalar helper type mismatch: {label} expected {expected:?}, got {actual:?}"
        )
        .into());
    }
    Ok(())
}

/// Invoke a `VARCHAR, ... -> VARCHAR` scalar of any arity (including zero).
///
/// `f` receives the row's arguments in order, with NULL inputs as `None`, and
/// its result is never NULL.
pub fn invoke_varchar_args_to_varchar<F>(
    input: &DataChunkHandle,
    output: &mut dyn WritableVector,
    mut f: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(&[Option<String>]) -> Result<String, Box<dyn Error>>,
{
    let len = input.len();
    let input_vecs: Vec<FlatVector> = (0..input.num_columns())
        .map(|idx| input.flat_vector(idx))
        .collect();
    for (idx, vec) in input_vecs.iter().enumerate() {
        ensure_type(vec, LogicalTypeId::Varchar, &format!("input[{idx}]"))?;
    }
    let input_slices: Vec<&[duckdb_string_t]> = input_vecs
        .iter()
        .map(|vec| vec.as_slice::<duckdb_string_t>())
        .collect();

    let output_vec = output.flat_vector();
    ensure_type(&output_vec, LogicalTypeId::Varchar, "output")?;

    let mut args: Vec<Option<String>> = Vec::with_capacity(input_vecs.len());
    for i in 0..len {
        args.clear();
        for (vec, slice) in input_vecs.iter().zip(input_slices.iter()) {
            if vec.row_is_null(i as u64) {
                args.push(None);
            } else {
                let mut raw = slice[i];
                args.push(Some(DuckString::new(&mut raw).as_str().into_owned()));
            }
        }

        let value = f(&args)?;
        output_vec.insert(i, CString::new(sanitize_for_cstring(&value).as_ref())?);
    }

    Ok(())
}
