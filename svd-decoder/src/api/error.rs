use thiserror::Error;

use crate::error::{LoadError, NumericFormatError, SvdParseError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("could not load SVD file")]
    Load(#[from] LoadError),
    #[error("could not parse SVD content")]
    Parse(#[from] SvdParseError),
    #[error("invalid numeric value in SVD")]
    NumericFormat(#[from] NumericFormatError),
}
