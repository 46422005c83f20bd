use crate::error::ExtractError;

/// Outcome of looking a single field up in one extraction tier.
///
/// `NotFound` means the source simply has no value. `Failed` means the
/// source had something but it was unusable, or the accessor is strict about
/// absence. The pipeline advances to the next tier on both.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Failed(ExtractError),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Lookup<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(err) => Lookup::Failed(err),
        }
    }

    pub fn and_then<U, F>(self, f: F) -> Lookup<U>
    where
        F: FnOnce(T) -> Lookup<U>,
    {
        match self {
            Lookup::Found(value) => f(value),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(err) => Lookup::Failed(err),
        }
    }

    /// Try `f` only when this lookup is `NotFound`; failures are kept.
    pub fn or_else<F>(self, f: F) -> Lookup<T>
    where
        F: FnOnce() -> Lookup<T>,
    {
        match self {
            Lookup::NotFound => f(),
            other => other,
        }
    }

    /// Turn a plain miss into a named failure.
    pub fn or_fail(self, err: ExtractError) -> Lookup<T> {
        match self {
            Lookup::NotFound => Lookup::Failed(err),
            other => other,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_else_only_replaces_not_found() {
        let missing: Lookup<u32> = Lookup::NotFound;
        assert_eq!(missing.or_else(|| Lookup::Found(3)), Lookup::Found(3));

        let failed: Lookup<u32> = Lookup::Failed(ExtractError::NoTimeInfo);
        assert_eq!(
            failed.or_else(|| Lookup::Found(3)),
            Lookup::Failed(ExtractError::NoTimeInfo)
        );
    }

    #[test]
    fn test_or_fail() {
        let missing: Lookup<u32> = Lookup::NotFound;
        assert_eq!(
            missing.or_fail(ExtractError::NotFoundInOpenGraph("image")),
            Lookup::Failed(ExtractError::NotFoundInOpenGraph("image"))
        );
        assert_eq!(Lookup::Found(1).or_fail(ExtractError::NoTimeInfo), Lookup::Found(1));
    }
}
