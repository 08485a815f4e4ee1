// DOM contract shared by mounting and the surface writer.

// Card markup
pub const AUTO_MOUNT_SELECTOR: &str = "[data-perspective-card]";
pub const TRANSFORMER_SELECTOR: &str = ".card__transformer";
pub const SHINE_SELECTOR: &str = ".card__shine";

// State classes
pub const HOVER_CLASS: &str = "card--over";
pub const ENLARGED_CLASS: &str = "card--enlarged";
pub const BACKDROP_CLASS: &str = "card-backdrop";

// Layering for the enlarged presentation
pub const ENLARGED_Z_INDEX: &str = "1000";
pub const BACKDROP_Z_INDEX: &str = "999";

// Visibility observer
pub const VISIBILITY_THRESHOLD: f64 = 0.1;
pub const VISIBILITY_ROOT_MARGIN: &str = "0%";

// Lifecycle events dispatched on the card element
pub const ENLARGED_EVENT: &str = "perspective-card:enlarged";
pub const COLLAPSED_EVENT: &str = "perspective-card:collapsed";

pub const CANCEL_KEY: &str = "Escape";
