use duckdb::vtab::BindInfo;
use libduckdb_sys::{
    duckdb_bind_get_named_parameter, duckdb_bind_info, duckdb_destroy_value, duckdb_free,
    duckdb_get_int64, duckdb_get_varchar, duckdb_is_null_value, duckdb_value,
};
use std::error::Error;
use std::ffi::{CStr, CString};
use std::os::raw::c_void;

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum NamedParameter<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> NamedParameter<T> {
    /// Omitted and explicit NULL both mean "use the default".
    pub(crate) fn into_option(self) -> Option<T> {
        match self {
            Self::Missing | Self::Null => None,
            Self::Value(value) => Some(value),
        }
    }
}

pub(crate) fn get_named_parameter_varchar(
    bind: &BindInfo,
    name: &str,
) -> Result<NamedParameter<String>, Box<dyn Error>> {
    with_named_parameter(bind, name, |value| {
        // SAFETY: `value` is a live, non-NULL duckdb_value for the duration of this closure.
        let varchar = unsafe { duckdb_get_varchar(value) };
        if varchar.is_null() {
            return Err(format!("Failed to read named parameter '{}' as VARCHAR", name).into());
        }

        // SAFETY: DuckDB returned a NUL-terminated string that we own and free exactly once.
        let text = unsafe {
            let text = CStr::from_ptr(varchar).to_string_lossy().into_owned();
            duckdb_free(varchar as *mut c_void);
            text
        };
        Ok(text)
    })
}

pub(crate) fn get_named_parameter_i64(
    bind: &BindInfo,
    name: &str,
) -> Result<NamedParameter<i64>, Box<dyn Error>> {
    with_named_parameter(bind, name, |value| {
        // SAFETY: `value` is a live, non-NULL duckdb_value; DuckDB casts it to BIGINT.
        Ok(unsafe { duckdb_get_int64(value) })
    })
}

fn with_named_parameter<T>(
    bind: &BindInfo,
    name: &str,
    read: impl FnOnce(duckdb_value) -> Result<T, Box<dyn Error>>,
) -> Result<NamedParameter<T>, Box<dyn Error>> {
    let name_cstr = CString::new(name)?;

    // SAFETY: The returned pointer is owned by DuckDB and valid only for this bind callback.
    // `bind_info_ptr` provides the raw C bind handle associated with `bind`.
    let mut value =
        unsafe { duckdb_bind_get_named_parameter(bind_info_ptr(bind), name_cstr.as_ptr()) };
    if value.is_null() {
        return Ok(NamedParameter::Missing);
    }

    // SAFETY: `value` is a valid `duckdb_value` handle returned by DuckDB.
    let result = if unsafe { duckdb_is_null_value(value) } {
        Ok(NamedParameter::Null)
    } else {
        read(value).map(NamedParameter::Value)
    };

    // SAFETY: `value` has not been destroyed yet and must be released once.
    unsafe {
        duckdb_destroy_value(&mut value);
    }

    result
}

fn bind_info_ptr(bind: &BindInfo) -> duckdb_bind_info {
    // SAFETY: duckdb-rs stores `duckdb_bind_info` as the only field inside
    // `duckdb::vtab::BindInfo`. The wrapper exposes no raw accessor and no null-aware typed
    // named-parameter accessor, so this cast is required for `duckdb_bind_get_named_parameter`
    // + `duckdb_is_null_value` interop.
    //
    // On duckdb-rs upgrades, re-validate the `BindInfo` layout in `src/vtab/function.rs`.
    unsafe { *(bind as *const BindInfo as *const duckdb_bind_info) }
}
