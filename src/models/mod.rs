pub mod blood_donations;
pub mod blood_inventory;
pub mod blood_requests;
pub mod blood_type;
pub mod hospitals;
pub mod search_candidates;

pub use blood_donations::BloodDonationRow;
pub use blood_inventory::BloodInventoryRow;
pub use blood_requests::BloodRequestRow;
pub use blood_type::{BloodType, RequestStatus, Urgency};
pub use hospitals::HospitalRow;
pub use search_candidates::{BloodAvailabilityRow, DonationCenterRow};
