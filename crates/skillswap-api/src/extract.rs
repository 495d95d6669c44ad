//! Extractors whose rejections render through [`AppError`], so a body or
//! path that fails to decode still answers 400 with `{"error": message}`.

use axum::Json;
use axum::extract::Path;
use axum_extra::extract::WithRejection;

use crate::error::AppError;

pub type JsonBody<T> = WithRejection<Json<T>, AppError>;

pub type PathParam<T> = WithRejection<Path<T>, AppError>;
