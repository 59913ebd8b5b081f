use crate::error::MisuseError;

use super::BackgroundOperation;

/// An operation whose result is known up front.
#[derive(Debug, Clone)]
pub struct Ready<T> {
    value: Option<T>,
}

impl<T> Ready<T> {
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }
}

impl<T> BackgroundOperation for Ready<T> {
    type Output = T;

    fn is_ready(&self) -> bool {
        true
    }

    fn take_result(&mut self) -> Result<T, MisuseError> {
        self.value.take().ok_or(MisuseError::AlreadyTaken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_take_is_misuse() {
        let mut op = Ready::new("done");
        assert!(op.is_ready());
        assert_eq!(op.take_result(), Ok("done"));
        assert_eq!(op.take_result(), Err(MisuseError::AlreadyTaken));
        // Still ready: readiness never reverts.
        assert!(op.is_ready());
    }
}
