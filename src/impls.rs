use std::fmt::Display;

/// For results whose error only needs to reach the log.
pub trait LoggableErrorResult<T> {
    fn ok_or_log(self) -> Option<T>;
}

impl<T, E: Display> LoggableErrorResult<T> for Result<T, E> {
    fn ok_or_log(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_or_log_keeps_value_and_drops_error() {
        assert_eq!(Ok::<_, String>(5).ok_or_log(), Some(5));
        assert_eq!(Err::<i32, _>("db is down").ok_or_log(), None);
    }
}
