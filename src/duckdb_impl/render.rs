use std::error::Error;
use std::path::Path;

use duckdb::{
    core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId},
    vscalar::{ScalarFunctionSignature, VScalar},
    vtab::arrow::WritableVector,
};

use super::scalar::invoke_varchar_args_to_varchar;
use crate::config::StatsConfig;
use crate::error::StatsError;
use crate::ingest::{Compression, Encoding, read_upload};
use crate::log;
use crate::view::{ViewRequest, render_upload};

const PATH_ARG: usize = 0;
const REQUEST_ARG: usize = 1;
const ENCODING_ARG: usize = 2;

/// `swars_view_json([path [, request [, encoding]]])`: the whole dashboard as JSON.
pub(crate) struct SwarsViewJsonScalar;

impl VScalar for SwarsViewJsonScalar {
    type State = ();

    unsafe fn invoke(
        _state: &Self::State,
        input: &mut DataChunkHandle,
        output: &mut dyn WritableVector,
    ) -> Result<(), Box<dyn Error>> {
        invoke_varchar_args_to_varchar(input, output, |args| {
            let json = view_json(args)
                .inspect_err(|e| log::error(format!("swars_view_json: {e}")))?;
            Ok(json)
        })
    }

    fn signatures() -> Vec<ScalarFunctionSignature> {
        (0..=ENCODING_ARG + 1)
            .map(|arity| {
                ScalarFunctionSignature::exact(
                    (0..arity)
                        .map(|_| LogicalTypeHandle::from(LogicalTypeId::Varchar))
                        .collect(),
                    LogicalTypeHandle::from(LogicalTypeId::Varchar),
                )
            })
            .collect()
    }
}

/// Missing or NULL path renders the upload prompt.
fn view_json(args: &[Option<String>]) -> Result<String, StatsError> {
    let arg = |idx: usize| args.get(idx).and_then(Option::as_deref);

    let request = arg(REQUEST_ARG)
        .map(ViewRequest::from_json)
        .transpose()?
        .unwrap_or_default();
    let encoding = arg(ENCODING_ARG)
        .map(Encoding::parse)
        .transpose()?
        .unwrap_or_default();
    let upload = arg(PATH_ARG)
        .map(|path| read_upload(Path::new(path), Compression::Plain))
        .transpose()?;

    render_upload(
        upload.as_deref(),
        encoding,
        &request,
        &StatsConfig::default(),
    )?
    .to_json()
}
