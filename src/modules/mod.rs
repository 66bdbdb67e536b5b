pub mod guardians;
pub mod students;
pub mod teachers;
pub mod users;
