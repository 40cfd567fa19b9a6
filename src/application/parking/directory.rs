//! Plate → user profile directory.

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RegisterUser, UserProfile};
use crate::support::validations::validate_request;

#[derive(Default)]
pub struct UserDirectory {
    users: BTreeMap<String, UserProfile>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, request: RegisterUser) -> DomainResult<UserProfile> {
        validate_request(&request)?;
        if self.users.contains_key(&request.plate) {
            return Err(DomainError::DuplicatePlate(request.plate));
        }

        let profile = request.into_profile();
        info!(
            plate = profile.plate.as_str(),
            class = %profile.class,
            "User registered"
        );
        self.users.insert(profile.plate.clone(), profile.clone());
        Ok(profile)
    }

    /// Registered profile, or a transient guest profile for unknown plates.
    pub fn resolve(&self, plate: &str, driver_name: &str) -> UserProfile {
        self.users
            .get(plate)
            .cloned()
            .unwrap_or_else(|| UserProfile::guest(plate, driver_name))
    }

    /// All registered profiles ordered by plate.
    pub fn list(&self) -> Vec<UserProfile> {
        self.users.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserClass;

    #[test]
    fn register_and_resolve() {
        let mut directory = UserDirectory::new();
        directory
            .register(RegisterUser::new("MH01", "Asha", UserClass::Resident, "Apt 5B"))
            .unwrap();

        let profile = directory.resolve("MH01", "ignored");
        assert_eq!(profile.class, UserClass::Resident);
        assert_eq!(profile.driver_name, "Asha");
    }

    #[test]
    fn unknown_plate_resolves_to_guest() {
        let directory = UserDirectory::new();
        let profile = directory.resolve("KA99", "Ravi");
        assert_eq!(profile.class, UserClass::Guest);
        assert_eq!(profile.driver_name, "Ravi");
        assert_eq!(profile.billing_id, "N/A");
        assert!(directory.is_empty());
    }

    #[test]
    fn duplicate_plate_is_rejected() {
        let mut directory = UserDirectory::new();
        directory
            .register(RegisterUser::new("MH01", "Asha", UserClass::Resident, "Apt 5B"))
            .unwrap();
        let err = directory
            .register(RegisterUser::new("MH01", "Other", UserClass::Hotel, "Room 1"))
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicatePlate("MH01".into()));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut directory = UserDirectory::new();
        for request in [
            RegisterUser::new("", "Asha", UserClass::Resident, "Apt 5B"),
            RegisterUser::new("MH01", " ", UserClass::Resident, "Apt 5B"),
            RegisterUser::new("MH01", "Asha", UserClass::Resident, ""),
        ] {
            let err = directory.register(request).unwrap_err();
            assert_eq!(err.kind(), "ValidationError");
        }
        assert!(directory.is_empty());
    }

    #[test]
    fn list_is_ordered_by_plate() {
        let mut directory = UserDirectory::new();
        directory
            .register(RegisterUser::new("ZZ1", "Zed", UserClass::Staff, "Ops"))
            .unwrap();
        directory
            .register(RegisterUser::new("AA1", "Ann", UserClass::Hotel, "Room 7"))
            .unwrap();
        let plates: Vec<_> = directory.list().into_iter().map(|p| p.plate).collect();
        assert_eq!(plates, vec!["AA1", "ZZ1"]);
    }
}
