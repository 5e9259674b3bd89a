pub mod booking;
pub mod user;
pub mod vehicle;

pub use booking::{Booking, BookingChange, BookingPatch, BookingPurpose, BookingStatus, NewBooking};
pub use user::{CompanionLink, NewCompanionLink, NewUser, User, UserRole, UserUpdate};
pub use vehicle::{NewVehicle, Vehicle, VehicleCategory, VehicleUpdate};
