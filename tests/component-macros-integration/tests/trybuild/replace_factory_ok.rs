use component_macros::replace;
use infrastructure_common::{replacement_catalog, DependencyError, ServiceLocator};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}


impl OffsetClock {
    fn create(locator: &dyn ServiceLocator) -> Result<Self, DependencyError> {
        Ok(Self {
            offset: locator.get::<u64>("offset")?,
        })
    }
}

#[replace(
    service = dyn Clock,
    name = "clock",
    qualifier = "utc",
    priority = -1,
    factory = OffsetClock::create
)]
struct OffsetClock {
    offset: Arc<u64>,
}

impl Clock for OffsetClock {
    fn now(&self) -> u64 {
        *self.offset
    }
}

fn main() {
    let descriptor = replacement_catalog().find_implementation("OffsetClock").unwrap();
    assert_eq!(descriptor.qualifier, Some("utc"));
    assert_eq!(descriptor.priority, -1);
}
