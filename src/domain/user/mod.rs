//! User directory entities

pub mod model;

pub use model::{RegisterUser, UserClass, UserProfile, GUEST_BILLING_ID, GUEST_DRIVER_NAME};
