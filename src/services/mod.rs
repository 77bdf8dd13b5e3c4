pub mod blood_request_service;
pub mod donation_service;
pub mod geo;
pub mod hospital_service;
pub mod identity_service;
pub mod inventory_service;
pub mod search_service;
pub mod validation;
