use uuid::Uuid;

/// Source of fresh request ids for rows that do not carry their own.
pub trait RequestIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs, one per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidRequestIds;

impl RequestIdGenerator for UuidRequestIds {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `{prefix}-{n}` ids for tests.
#[cfg(test)]
#[derive(Debug)]
pub struct SequentialRequestIds {
    prefix: String,
    next: std::sync::atomic::AtomicUsize
}

#[cfg(test)]
impl SequentialRequestIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: std::sync::atomic::AtomicUsize::new(1)
        }
    }
}

#[cfg(test)]
impl RequestIdGenerator for SequentialRequestIds {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}
