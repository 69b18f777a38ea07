pub mod csv_export;
pub mod jwt;
pub mod password;
pub mod validation;

pub use csv_export::{APPLICANT_CSV_HEADERS, applications_to_csv};
pub use jwt::*;
pub use password::*;
pub use validation::*;
