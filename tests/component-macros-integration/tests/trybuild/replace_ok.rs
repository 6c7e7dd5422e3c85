use component_macros::replace;
use infrastructure_common::replacement_catalog;

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Default)]
#[replace(service = dyn Clock, priority = 2)]
struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> u64 {
        0
    }
}

fn main() {
    let descriptor = replacement_catalog().find_implementation("FrozenClock").unwrap();
    assert_eq!(descriptor.target_name(), "clock");
    assert_eq!(descriptor.priority, 2);
}
