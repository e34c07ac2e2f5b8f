//! Outcomes of repository write and export operations.
//!
//! Each operation returns exactly one of these; store faults are reported here
//! rather than as `Err`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateItemResult {
    Success,
    Error(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateItemResult {
    Success,
    Error(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteItemResult {
    Success,
    Error(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDataResult {
    Success,
    Error,
}

macro_rules! impl_is_success {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                pub fn is_success(&self) -> bool {
                    matches!(self, Self::Success)
                }
            }
        )*
    };
}

impl_is_success!(CreateItemResult, UpdateItemResult, DeleteItemResult, ExportDataResult);
