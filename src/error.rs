//! Crate-level error type aggregating the per-module errors.

use thiserror::Error;

use crate::detail::DetailError;
use crate::product::ProductError;
use crate::scene::SceneError;
use crate::state::StateError;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Detail(#[from] DetailError),
}
