use crate::error::BoardError;

/// Progress of one asynchronous container operation.
///
/// Every network-bound operation dispatches `Pending` before calling the
/// gateway and exactly one of `Fulfilled`/`Rejected` once it resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> From<&Result<T, BoardError>> for Lifecycle<T>
where
    T: Clone,
{
    fn from(result: &Result<T, BoardError>) -> Self {
        match result {
            Ok(value) => Lifecycle::Fulfilled(value.clone()),
            Err(e) => Lifecycle::Rejected(e.to_string()),
        }
    }
}
