pub mod coverage;
pub mod health;
pub mod instructor;
pub mod lesson;
pub mod swimmer;
pub mod waitlist;
