use once_cell::sync::Lazy;
use runtime::event_bus::{EventBus, Subscription};
use scene::hover::HoverEvent;

/// Channel between the journey list and map views.
pub type HoverBus = EventBus<HoverEvent>;
pub type HoverSubscription = Subscription<HoverEvent>;

static SHARED: Lazy<HoverBus> = Lazy::new(HoverBus::new);

/// The process-wide hover channel.
pub fn shared_hover_bus() -> HoverBus {
    SHARED.clone()
}
