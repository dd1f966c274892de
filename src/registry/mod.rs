// Static reference data consulted by the normalizers

pub mod cities;

pub use cities::{City, CITIES};
