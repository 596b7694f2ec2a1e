pub mod entities;
pub mod password;
pub mod use_cases;
pub mod validation;
