use error::PcurateError;

pub mod curate;
pub mod error;
pub mod filter;
pub mod record;
pub mod repopulate;
pub mod source;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_utils;

pub type PcurateResult<T> = std::result::Result<T, PcurateError>;
