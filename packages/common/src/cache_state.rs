use std::future::Future;

/// Cache state of a single VIN key.
///
/// A key moves from `Uncached` to `Cached` exactly once and never back;
/// cached records are never recomputed or refreshed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheState<R> {
    Uncached,
    Cached(R),
}

/// Outcome of persisting a freshly decoded record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome<R> {
    /// This request committed the record.
    Inserted(R),
    /// A concurrent request committed first; its row is authoritative.
    AlreadyCached(R),
}

/// How a lookup was answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution<R> {
    /// Served from the stored record.
    Hit(R),
    /// The key was uncached and has now been populated.
    Miss(InsertOutcome<R>),
}

impl<R> CacheState<R> {
    pub fn from_lookup(found: Option<R>) -> Self {
        match found {
            Some(record) => Self::Cached(record),
            None => Self::Uncached,
        }
    }

    /// Serve a cached record as-is, or run `populate` for an uncached key.
    ///
    /// `populate` is invoked at most once and only from `Uncached`.
    pub async fn resolve<F, Fut, E>(self, populate: F) -> Result<Resolution<R>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<InsertOutcome<R>, E>>,
    {
        match self {
            Self::Cached(record) => Ok(Resolution::Hit(record)),
            Self::Uncached => Ok(Resolution::Miss(populate().await?)),
        }
    }
}

impl<R> Resolution<R> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn into_record(self) -> R {
        match self {
            Self::Hit(record) => record,
            Self::Miss(outcome) => outcome.into_record(),
        }
    }
}

impl<R> InsertOutcome<R> {
    pub fn was_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }

    pub fn record(&self) -> &R {
        match self {
            Self::Inserted(record) | Self::AlreadyCached(record) => record,
        }
    }

    pub fn into_record(self) -> R {
        match self {
            Self::Inserted(record) | Self::AlreadyCached(record) => record,
        }
    }
}
