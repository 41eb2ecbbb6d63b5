pub mod geo;
pub mod property;

pub use geo::{GeoBounds, GeoPoint, Rect, ScreenPoint};
pub use property::{PropertyId, PropertyRecord};
