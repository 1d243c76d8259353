pub mod person;
pub mod persona;
pub mod review;
