pub mod chat;
pub mod gpa;
pub mod health;
